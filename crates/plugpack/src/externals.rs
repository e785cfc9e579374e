//! External-reference resolution
//!
//! Builds the externals list of a plugin build: the host's common shared
//! libraries, then the compatibility set for hosts without runtime dependency
//! management, then whatever the caller declared. The bundler resolves
//! externals by first match, so the order is part of the contract.

use plugpack_core::{BuildOptions, ExternalLib, ExternalMatcher};

/// Libraries every host provides.
pub fn common_externals() -> Vec<ExternalMatcher> {
    vec![
        ExternalMatcher::pattern(r"^@angular/.+$"),
        ExternalMatcher::pattern(r"^@ngrx/.+$"),
        ExternalMatcher::pattern(r"^@vcd/common$"),
        ExternalMatcher::pattern(r"^@vcd-ui/common$"),
        ExternalMatcher::alias("reselect", "reselect"),
    ]
}

/// Libraries provided by hosts that predate runtime dependency management.
pub fn compatibility_externals() -> Vec<ExternalMatcher> {
    vec![
        ExternalMatcher::pattern(r"^rxjs(/.+)?$"),
        ExternalMatcher::pattern(r"^@clr/.+$"),
        ExternalMatcher::alias("clarity-angular", "clarity-angular"),
    ]
}

/// Convert caller-declared externals to matchers, keeping their order.
///
/// Pattern sources are not compiled here.
pub fn extract_external_matchers(libs: &[ExternalLib]) -> Vec<ExternalMatcher> {
    libs.iter()
        .map(|lib| match lib {
            ExternalLib::Pattern(source) => ExternalMatcher::pattern(source.clone()),
            ExternalLib::Mapping(map) => ExternalMatcher::Mapping(map.clone()),
        })
        .collect()
}

/// The complete externals list for `options`.
pub fn resolve_externals(options: &BuildOptions) -> Vec<ExternalMatcher> {
    let mut externals = Vec::new();

    if !options.ignore_default_externals {
        externals.extend(common_externals());

        if !options.enable_runtime_dependency_management {
            externals.extend(compatibility_externals());
        }
    }

    externals.extend(extract_external_matchers(&options.external_libs));

    tracing::debug!(count = externals.len(), "externals resolved");
    externals
}

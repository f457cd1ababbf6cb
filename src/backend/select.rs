//! Backend selection.

use crate::analyzer::SourceFeatures;
use crate::backend::{BackendKind, BackendPreference};

/// Decide which backend to invoke.
///
/// Priority order, first match wins:
/// 1. A forced preference always yields that backend, even when it is
///    absent - absence is reported by the execution step, not here.
/// 2. Automatic: prefer the SDK when it is available and the source looks
///    modern; sources that need a Windows desktop toolkit never fall back
///    to csc.exe (it cannot reference those toolkits); otherwise take
///    whatever is installed, csc.exe first.
///
/// Returns `None` when nothing is resolvable - the caller attempts
/// provisioning once and retries.
pub fn select_backend(
    features: &SourceFeatures,
    preference: BackendPreference,
    csc_available: bool,
    dotnet_available: bool,
) -> Option<BackendKind> {
    match preference {
        BackendPreference::ForceCsc => Some(BackendKind::Csc),
        BackendPreference::ForceDotnet => Some(BackendKind::Dotnet),
        BackendPreference::Auto => {
            if dotnet_available && features.prefers_dotnet {
                Some(BackendKind::Dotnet)
            } else if features.needs_windows_desktop() {
                // Hard rule: desktop sources are SDK-or-nothing.
                dotnet_available.then_some(BackendKind::Dotnet)
            } else if csc_available {
                Some(BackendKind::Csc)
            } else if dotnet_available {
                Some(BackendKind::Dotnet)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;

    const PLAIN: &str = "using System;\nclass P { static void Main() {} }";
    const WINFORMS: &str = "using System.Windows.Forms;\nclass P {}";
    const MODERN: &str = "public record Point(int X, int Y);";
    const APPCONFIG: &str = "class P { static void Main() { ApplicationConfiguration.Initialize(); } }";

    #[test]
    fn test_forced_csc_ignores_availability() {
        let f = analyze(PLAIN);
        assert_eq!(
            select_backend(&f, BackendPreference::ForceCsc, false, true),
            Some(BackendKind::Csc)
        );
    }

    #[test]
    fn test_forced_dotnet_ignores_availability() {
        let f = analyze(WINFORMS);
        assert_eq!(
            select_backend(&f, BackendPreference::ForceDotnet, true, false),
            Some(BackendKind::Dotnet)
        );
    }

    #[test]
    fn test_auto_prefers_dotnet_for_modern_source() {
        let f = analyze(MODERN);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, true),
            Some(BackendKind::Dotnet)
        );
    }

    #[test]
    fn test_auto_winforms_never_selects_csc() {
        let f = analyze(WINFORMS);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, true),
            Some(BackendKind::Dotnet)
        );
        // Even with only csc installed, a desktop source must not go to it.
        assert_eq!(select_backend(&f, BackendPreference::Auto, true, false), None);
    }

    #[test]
    fn test_auto_appconfig_init_selects_dotnet() {
        let f = analyze(APPCONFIG);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, true),
            Some(BackendKind::Dotnet)
        );
    }

    #[test]
    fn test_auto_plain_source_takes_csc_first() {
        let f = analyze(PLAIN);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, true),
            Some(BackendKind::Csc)
        );
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, false),
            Some(BackendKind::Csc)
        );
    }

    #[test]
    fn test_auto_modern_source_falls_back_to_csc() {
        // Modern syntax without desktop toolkits may still fall back to the
        // Framework compiler when the SDK is absent; the compile will fail
        // with the compiler's own message and the too-old hint.
        let f = analyze(MODERN);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, true, false),
            Some(BackendKind::Csc)
        );
    }

    #[test]
    fn test_auto_dotnet_only() {
        let f = analyze(PLAIN);
        assert_eq!(
            select_backend(&f, BackendPreference::Auto, false, true),
            Some(BackendKind::Dotnet)
        );
    }

    #[test]
    fn test_auto_nothing_available() {
        let f = analyze(PLAIN);
        assert_eq!(select_backend(&f, BackendPreference::Auto, false, false), None);
    }
}

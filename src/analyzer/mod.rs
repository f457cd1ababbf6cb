//! Source feature detection for C# files.
//!
//! A best-effort classifier over raw source text: pure substring
//! containment, no parsing or tokenization. False positives and negatives
//! are acceptable; the result only steers backend selection and the
//! generated project descriptor, and a wrong guess surfaces as an ordinary
//! compile failure with the real compiler's message.

/// Modern language and API markers that suggest the Framework-era compiler
/// will choke on the source.
const MODERN_MARKERS: &[&str] = &[
    "using var ",      // C# 8
    "record ",         // C# 9
    "init;",           // C# 9
    "MathF.",          // newer .NET
    "object?",         // nullable
    "string?",         // nullable
    "Span<",           // often newer code
    "async Task Main", // C# 7.1+
];

/// Feature flags derived from one look at the source text.
///
/// Immutable; built once per compile attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFeatures {
    /// References the Windows Forms namespace or its usage pattern.
    pub uses_winforms: bool,

    /// References the WPF stack.
    pub uses_wpf: bool,

    /// Calls the modern WinForms template bootstrap.
    pub has_appconfig_init: bool,

    /// The SDK pipeline should be preferred over the Framework compiler.
    pub prefers_dotnet: bool,
}

impl SourceFeatures {
    /// Any flag that forces a Windows desktop target.
    ///
    /// When this holds, the Framework compiler is never an acceptable
    /// automatic choice: it cannot reference the modern desktop toolkits.
    pub fn needs_windows_desktop(&self) -> bool {
        self.uses_winforms || self.uses_wpf || self.has_appconfig_init
    }
}

/// Inspect raw source text and report feature flags.
///
/// Never fails; unreadable files are the caller's concern.
pub fn analyze(source: &str) -> SourceFeatures {
    let uses_winforms = source.contains("System.Windows.Forms")
        || (source.contains("Form") && source.contains("Application."));

    let uses_wpf = source.contains("UseWPF")
        || source.contains("PresentationFramework")
        || (source.contains("System.Windows") && source.contains("Window"));

    let has_appconfig_init = source.contains("ApplicationConfiguration.Initialize");

    let seems_modern =
        has_appconfig_init || MODERN_MARKERS.iter().any(|m| source.contains(m));

    SourceFeatures {
        uses_winforms,
        uses_wpf,
        has_appconfig_init,
        prefers_dotnet: seems_modern || uses_winforms || uses_wpf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winforms_namespace_detected() {
        let f = analyze("using System.Windows.Forms;\nclass P {}");
        assert!(f.uses_winforms);
        assert!(f.prefers_dotnet);
        assert!(f.needs_windows_desktop());
    }

    #[test]
    fn test_winforms_usage_pattern_detected() {
        let f = analyze("class MainForm : Form { void Run() { Application.Run(this); } }");
        assert!(f.uses_winforms);
    }

    #[test]
    fn test_wpf_detected() {
        let f = analyze("using System.Windows;\nclass App { Window w; }");
        assert!(f.uses_wpf);
        assert!(f.needs_windows_desktop());
    }

    #[test]
    fn test_appconfig_init_detected() {
        let f = analyze("static void Main() { ApplicationConfiguration.Initialize(); }");
        assert!(f.has_appconfig_init);
        assert!(f.prefers_dotnet);
        assert!(f.needs_windows_desktop());
    }

    #[test]
    fn test_modern_syntax_markers() {
        for src in [
            "using var x = File.OpenRead(p);",
            "public record Point(int X, int Y);",
            "public int X { get; init; }",
            "var y = MathF.Sqrt(2f);",
            "object? o = null;",
            "string? s = null;",
            "Span<byte> buf = stackalloc byte[16];",
            "static async Task Main() {}",
        ] {
            let f = analyze(src);
            assert!(f.prefers_dotnet, "marker not detected in: {}", src);
            assert!(!f.needs_windows_desktop(), "desktop flag leaked for: {}", src);
        }
    }

    #[test]
    fn test_plain_source_prefers_nothing() {
        let f = analyze(
            "using System;\nclass Program { static void Main() { Console.WriteLine(\"hi\"); } }",
        );
        assert!(!f.uses_winforms);
        assert!(!f.uses_wpf);
        assert!(!f.has_appconfig_init);
        assert!(!f.prefers_dotnet);
    }

    #[test]
    fn test_empty_source() {
        let f = analyze("");
        assert!(!f.prefers_dotnet);
        assert!(!f.needs_windows_desktop());
    }
}

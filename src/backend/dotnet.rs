//! Modern backend: dotnet SDK publish pipeline.
//!
//! The SDK cannot compile a bare source file, so the adapter stages a
//! scratch project: the source is copied in as `Program.cs` next to a
//! generated `App.csproj`, `dotnet publish` runs against it, and the first
//! executable in the publish directory is delivered to the requested
//! output path.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analyzer::SourceFeatures;
use crate::backend::plan::runtime_identifier;
use crate::backend::{BuildPlan, BuildRequest, Invoked};
use crate::util::fs::{copy_artifact, first_exe_in, write_string};
use crate::util::logs::{LogDir, Phase};
use crate::util::process::ProcessBuilder;

/// Render the generated project descriptor.
///
/// Nullable and implicit usings are disabled so the scratch project
/// compiles arbitrary user source exactly as written. The WinForms flag is
/// also forced on by the modern template bootstrap call, which only exists
/// in WinForms projects.
pub fn render_project(plan: &BuildPlan, features: &SourceFeatures) -> String {
    let use_winforms = features.uses_winforms || features.has_appconfig_init;

    let mut extra_props = String::new();
    if use_winforms {
        extra_props.push_str("\n    <UseWindowsForms>true</UseWindowsForms>");
    }
    if features.uses_wpf {
        extra_props.push_str("\n    <UseWPF>true</UseWPF>");
    }

    format!(
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <OutputType>{output_type}</OutputType>
    <TargetFramework>{tfm}</TargetFramework>
    <ImplicitUsings>disable</ImplicitUsings>
    <Nullable>disable</Nullable>{extra_props}
  </PropertyGroup>
</Project>
"#,
        output_type = plan.target_kind.output_type(),
        tfm = plan.target_framework,
    )
}

/// Assemble the publish argument list.
pub fn publish_args(
    project: &Path,
    publish_dir: &Path,
    rid: &str,
    request: &BuildRequest,
) -> Vec<String> {
    let mut args = vec![
        "publish".to_string(),
        project.display().to_string(),
        "-c".to_string(),
        "Release".to_string(),
        "-o".to_string(),
        publish_dir.display().to_string(),
        "-r".to_string(),
        rid.to_string(),
        "--self-contained".to_string(),
        if request.self_contained { "true" } else { "false" }.to_string(),
    ];

    if request.single_file {
        args.push("-p:PublishSingleFile=true".to_string());
        args.push("-p:IncludeNativeLibrariesForSelfExtract=true".to_string());
    }

    args.push("-p:DebugType=none".to_string());
    args.push("-p:DebugSymbols=false".to_string());

    args
}

/// Invoke `dotnet publish` for a staged copy of the source and persist the
/// raw transcript.
///
/// `produced` is the requested output path once the artifact has been
/// located in the publish directory and copied there; `None` when the
/// publish exited nonzero or completed without yielding an executable.
pub fn publish(
    dotnet: &Path,
    features: &SourceFeatures,
    plan: &BuildPlan,
    request: &BuildRequest,
    logs: &LogDir,
) -> Result<Invoked> {
    let scratch = tempfile::Builder::new()
        .prefix("csforge-publish-")
        .tempdir()
        .context("failed to create scratch project directory")?;

    let project = scratch.path().join("App.csproj");
    let program = scratch.path().join("Program.cs");
    let publish_dir = scratch.path().join("publish");

    fs::copy(&request.source, &program).with_context(|| {
        format!("failed to stage source {}", request.source.display())
    })?;
    write_string(&project, &render_project(plan, features))?;

    let builder = ProcessBuilder::new(dotnet)
        .args(publish_args(&project, &publish_dir, runtime_identifier(), request))
        .cwd(scratch.path());
    let command = builder.display_command();

    let captured = builder.exec_capture()?;
    let log_path = logs.write_phase(Phase::ModernPublish, &captured.output)?;

    let mut produced = None;
    if captured.success() {
        if let Some(exe) = first_exe_in(&publish_dir)? {
            copy_artifact(&exe, &request.output)?;
            produced = Some(request.output.clone());
        }
    }

    Ok(Invoked {
        command,
        transcript: captured.output,
        log_path,
        code: captured.code,
        produced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::analyzer::analyze;
    use crate::backend::plan::DEFAULT_TARGET_FRAMEWORK;
    use crate::backend::{BackendKind, BackendPreference, TargetKind};

    fn request(self_contained: bool, single_file: bool) -> BuildRequest {
        BuildRequest {
            source: PathBuf::from("hello.cs"),
            output: PathBuf::from("hello.exe"),
            preference: BackendPreference::ForceDotnet,
            target_kind: TargetKind::Windowed,
            self_contained,
            single_file,
        }
    }

    #[test]
    fn test_render_plain_project() {
        let f = analyze("class P {}");
        let plan = BuildPlan::derive(&f, &request(true, true), BackendKind::Dotnet, DEFAULT_TARGET_FRAMEWORK);
        let proj = render_project(&plan, &f);

        assert!(proj.contains("<OutputType>WinExe</OutputType>"));
        assert!(proj.contains("<TargetFramework>net8.0</TargetFramework>"));
        assert!(proj.contains("<Nullable>disable</Nullable>"));
        assert!(proj.contains("<ImplicitUsings>disable</ImplicitUsings>"));
        assert!(!proj.contains("UseWindowsForms"));
        assert!(!proj.contains("UseWPF"));
    }

    #[test]
    fn test_render_winforms_project() {
        let f = analyze("using System.Windows.Forms;\nclass P {}");
        let plan = BuildPlan::derive(&f, &request(true, true), BackendKind::Dotnet, DEFAULT_TARGET_FRAMEWORK);
        let proj = render_project(&plan, &f);

        assert!(proj.contains("<TargetFramework>net8.0-windows</TargetFramework>"));
        assert!(proj.contains("<UseWindowsForms>true</UseWindowsForms>"));
    }

    #[test]
    fn test_render_appconfig_init_forces_winforms() {
        let f = analyze("ApplicationConfiguration.Initialize();");
        let plan = BuildPlan::derive(&f, &request(true, true), BackendKind::Dotnet, DEFAULT_TARGET_FRAMEWORK);
        let proj = render_project(&plan, &f);

        assert!(proj.contains("<UseWindowsForms>true</UseWindowsForms>"));
        assert!(proj.contains("net8.0-windows"));
    }

    #[test]
    fn test_render_wpf_project() {
        let f = analyze("using System.Windows;\nclass A { Window w; }");
        let plan = BuildPlan::derive(&f, &request(true, true), BackendKind::Dotnet, DEFAULT_TARGET_FRAMEWORK);
        let proj = render_project(&plan, &f);

        assert!(proj.contains("<UseWPF>true</UseWPF>"));
    }

    #[test]
    fn test_publish_args_full() {
        let args = publish_args(
            Path::new("/tmp/x/App.csproj"),
            Path::new("/tmp/x/publish"),
            "win-x64",
            &request(true, true),
        );

        assert_eq!(args[0], "publish");
        assert!(args.contains(&"-c".to_string()));
        assert!(args.contains(&"Release".to_string()));
        assert!(args.contains(&"win-x64".to_string()));
        assert!(args.contains(&"--self-contained".to_string()));
        assert!(args.contains(&"true".to_string()));
        assert!(args.contains(&"-p:PublishSingleFile=true".to_string()));
        assert!(args.contains(&"-p:IncludeNativeLibrariesForSelfExtract=true".to_string()));
        assert!(args.contains(&"-p:DebugType=none".to_string()));
        assert!(args.contains(&"-p:DebugSymbols=false".to_string()));
    }

    #[test]
    fn test_publish_args_framework_dependent() {
        let args = publish_args(
            Path::new("App.csproj"),
            Path::new("publish"),
            "win-x86",
            &request(false, false),
        );

        let sc_pos = args.iter().position(|a| a == "--self-contained").unwrap();
        assert_eq!(args[sc_pos + 1], "false");
        assert!(!args.iter().any(|a| a.contains("PublishSingleFile")));
    }
}

//! Command line integration tests.
//!
//! These tests drive the toolkit end to end over a scripted process layer:
//! - Capability discovery happens once and feeds command validation
//! - Built commands reach ffmpeg with the baseline flags in front
//! - Tool failures surface with their stderr

use std::sync::Arc;

use tempfile::TempDir;

use ffkit_core::{
    runner::{Tool, ToolOutput},
    testing::{fixtures, ScriptedRunner},
    Audio, FfmpegCommand, Format, Input, InvocationMode, Output, Subtitle, TimeSpec, ToolError,
    Toolkit, ToolsConfig, Video, VideoConvertOptions,
};

struct TestHarness {
    toolkit: Toolkit,
    runner: ScriptedRunner,
    media_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let media_dir = TempDir::new().expect("Failed to create media dir");
        let runner = ScriptedRunner::new();
        fixtures::script_discovery(&runner);
        runner.set_default(ToolOutput::success(Vec::<u8>::new()));

        let toolkit = Toolkit::with_runner(ToolsConfig::default(), Arc::new(runner.clone()))
            .expect("Failed to create toolkit");

        Self {
            toolkit,
            runner,
            media_dir,
        }
    }

    fn media(&self, name: &str) -> String {
        let path = self.media_dir.path().join(name);
        std::fs::write(&path, b"media").expect("Failed to write media");
        path.to_string_lossy().to_string()
    }
}

#[tokio::test]
async fn test_two_pass_style_command() {
    let harness = TestHarness::new();
    let source = harness.media("sintel.mkv");
    let caps = harness.toolkit.capabilities().capabilities().await.unwrap();

    let command = FfmpegCommand::new(
        [Input::new(source.as_str())
            .unwrap()
            .with_seek(TimeSpec::from_millis(30_500))
            .with_duration(10u32)],
        [
            Output::new("/out/clip.webm")
                .with_stream(Video::vp9(caps.encoders, Some(28)).unwrap().with_scale((640, -2)))
                .with_stream(Audio::opus(caps.encoders).unwrap().with_bit_rate("96k"))
                .with_stream(Subtitle::disabled())
                .with_format(Format::webm(caps.formats).unwrap()),
            Output::new("/out/audio.m4a")
                .with_stream(Video::disabled())
                .with_stream(Audio::copy())
                .with_format(Format::mp4(caps.formats, true).unwrap()),
        ],
    );
    command.run(harness.toolkit.toolchain()).await.unwrap();

    let invocation = harness.runner.last_invocation().unwrap();
    assert_eq!(invocation.tool, Tool::Ffmpeg);
    assert_eq!(invocation.timeout, None);
    assert_eq!(
        invocation.args.join(" "),
        format!(
            "-hide_banner -v error -y -ss 30.5 -t 10.0 -i {source} \
             -c:v libvpx-vp9 -vf scale=640:-2 -crf 28 -b:v 0 -quality good \
             -c:a libopus -b:a 96k -sn -f webm /out/clip.webm \
             -vn -c:a copy -f mp4 -movflags faststart /out/audio.m4a"
        )
    );
}

#[tokio::test]
async fn test_discovery_runs_once_across_operations() {
    let harness = TestHarness::new();
    let source = harness.media("talk.mp4");

    harness
        .toolkit
        .convert_to_h264(&source, "/out/a.mp4", &VideoConvertOptions::default())
        .await
        .unwrap();
    harness
        .toolkit
        .convert_to_webm(&source, "/out/a.webm", &VideoConvertOptions::default())
        .await
        .unwrap();
    harness
        .toolkit
        .extract_audio(&source, "/out/a.mka", Some("matroska"), None, None)
        .await
        .unwrap();

    assert_eq!(harness.runner.count_with_arg("-encoders"), 1);
    assert_eq!(harness.runner.count_with_arg("-formats"), 1);
    assert_eq!(harness.runner.count_with_arg("-codecs"), 0);

    let discovery: Vec<_> = harness
        .runner
        .invocations()
        .into_iter()
        .filter(|i| i.args.iter().any(|a| a == "-encoders" || a == "-formats"))
        .collect();
    assert!(discovery.iter().all(|i| i.timeout.is_some()));
}

#[tokio::test]
async fn test_unknown_names_rejected_before_spawn() {
    let harness = TestHarness::new();
    let source = harness.media("talk.mp4");

    let err = harness
        .toolkit
        .extract_audio(&source, "/out/a.xyz", Some("no-such-muxer"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::UnsupportedFormat { ref name } if name == "no-such-muxer"));

    let err = harness
        .toolkit
        .extract_audio(&source, "/out/a.ogg", None, Some("libfoo"), None)
        .await
        .unwrap_err();
    assert!(err.is_unsupported_capability());

    let spawned_ffmpeg_jobs = harness
        .runner
        .invocations()
        .into_iter()
        .filter(|i| i.args.contains(&source))
        .count();
    assert_eq!(spawned_ffmpeg_jobs, 0);
}

#[tokio::test]
async fn test_tool_failure_carries_stderr() {
    let harness = TestHarness::new();
    let source = harness.media("broken.mkv");
    harness
        .runner
        .respond(Tool::Ffmpeg, source.clone(), ToolOutput::failure(1, "Conversion failed!\n"));

    let err = harness
        .toolkit
        .remove_audio(&source, "/out/silent.mkv", None, true)
        .await
        .unwrap_err();

    match err {
        ToolError::ToolFailed { tool, code, stderr } => {
            assert_eq!(tool, Tool::Ffmpeg);
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "Conversion failed!");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_discovery_timeout_is_retried() {
    let runner = ScriptedRunner::new();
    runner.push_timeout();
    fixtures::script_discovery(&runner);
    let toolkit = Toolkit::with_runner(ToolsConfig::default(), Arc::new(runner.clone())).unwrap();

    let err = toolkit.capabilities().encoders().await.unwrap_err();
    assert!(matches!(err, ToolError::Timeout { tool: Tool::Ffmpeg, timeout_secs: 5 }));

    let encoders = toolkit.capabilities().encoders().await.unwrap();
    assert!(encoders.contains("libx264"));
    assert_eq!(runner.count_with_arg("-encoders"), 2);
}

#[tokio::test]
async fn test_versions() {
    let harness = TestHarness::new();
    let capabilities = harness.toolkit.capabilities();

    assert_eq!(capabilities.ffmpeg_version().await.unwrap(), "4.1.2");
    assert_eq!(capabilities.ffprobe_version().await.unwrap(), "4.1.2");

    let text = harness
        .toolkit
        .toolchain()
        .ffmpeg_text(&["-version".to_string()], InvocationMode::Quick)
        .await
        .unwrap();
    assert!(text.starts_with("ffmpeg version 4.1.2"));
}

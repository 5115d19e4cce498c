//! One-call helpers for common jobs, built on the command model.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::capabilities::{Capabilities, CapabilityDirectory};
use crate::config::{load_config, validate_config, ToolsConfig};
use crate::convert::{
    Audio, BitRate, FfmpegCommand, Format, Input, Output, Scale, Subtitle, TimeSpec, Video,
};
use crate::probe::{self, MediaInfo};
use crate::runner::{ToolError, ToolRunner, Toolchain};

/// Image formats a thumbnail can be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThumbnailFormat {
    #[default]
    Png,
    Jpg,
    Gif,
    Tiff,
    Bmp,
}

impl ThumbnailFormat {
    pub const ALL: [Self; 5] = [Self::Png, Self::Jpg, Self::Gif, Self::Tiff, Self::Bmp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }

    /// The image encoder that produces this format.
    pub fn encoder(&self) -> &'static str {
        match self {
            Self::Jpg => "mjpeg",
            other => other.as_str(),
        }
    }

    fn extra_args(&self) -> &'static [&'static str] {
        match self {
            Self::Tiff => &["-pix_fmt", "rgb24"],
            _ => &[],
        }
    }
}

impl FromStr for ThumbnailFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ToolError::UnsupportedImageFormat {
                format: s.to_string(),
            })
    }
}

impl fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for the video conversion shortcuts. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoConvertOptions {
    /// Encoder speed preset. Ignored for WebM.
    pub preset: Option<String>,
    /// Constant rate factor.
    pub crf: Option<u8>,
    /// Ignored for WebM, which encodes in constant quality mode.
    pub video_bit_rate: Option<BitRate>,
    pub audio_bit_rate: Option<BitRate>,
    pub scale: Option<Scale>,
    /// Extra arguments for the video stream.
    pub extra: Vec<String>,
}

/// Tuning for the audio conversion shortcuts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioConvertOptions {
    pub bit_rate: Option<BitRate>,
    pub channels: Option<u32>,
    /// Extra arguments for the audio stream.
    pub extra: Vec<String>,
}

/// Entry point tying together tool invocation, capability discovery,
/// inspection and conversion.
///
/// # Example
///
/// ```ignore
/// let toolkit = Toolkit::from_env()?;
/// let info = toolkit.inspect("sintel.mkv").await?;
/// if info.has_video() {
///     let png = toolkit
///         .thumbnail("sintel.mkv", 2u32, ThumbnailFormat::Png)
///         .await?;
/// }
/// ```
#[derive(Debug)]
pub struct Toolkit {
    directory: CapabilityDirectory,
}

impl Toolkit {
    /// Creates a toolkit that spawns the real tools.
    pub fn new(config: ToolsConfig) -> Result<Self, ToolError> {
        validate_config(&config)?;
        Ok(Self::from_toolchain(Toolchain::new(&config)?))
    }

    /// Creates a toolkit configured from the process environment.
    pub fn from_env() -> Result<Self, ToolError> {
        Self::new(ToolsConfig::from_env()?)
    }

    /// Creates a toolkit configured from a TOML file, with environment
    /// overrides applied on top.
    pub fn from_file(path: &Path) -> Result<Self, ToolError> {
        Self::new(load_config(path)?)
    }

    /// Creates a toolkit with a custom process layer.
    pub fn with_runner(
        config: ToolsConfig,
        runner: Arc<dyn ToolRunner>,
    ) -> Result<Self, ToolError> {
        validate_config(&config)?;
        Ok(Self::from_toolchain(Toolchain::with_runner(&config, runner)?))
    }

    pub fn from_toolchain(toolchain: Toolchain) -> Self {
        Self {
            directory: CapabilityDirectory::new(toolchain),
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        self.directory.toolchain()
    }

    pub fn capabilities(&self) -> &CapabilityDirectory {
        &self.directory
    }

    /// Inspects a local file or stream URL.
    pub async fn inspect(&self, source: &str) -> Result<MediaInfo, ToolError> {
        probe::inspect(self.toolchain(), source).await
    }

    /// Grabs one frame at `seek` and returns it encoded as an image.
    pub async fn thumbnail(
        &self,
        source: &str,
        seek: impl Into<TimeSpec>,
        format: ThumbnailFormat,
    ) -> Result<Vec<u8>, ToolError> {
        let input = Input::new(source)?.with_seek(seek);
        let caps = self.directory.capabilities().await?;

        let video = Video::new(format.encoder(), caps.encoders)?
            .with_frames(1)
            .with_extra(format.extra_args().iter().copied());
        let output = Output::new("-")
            .with_stream(video)
            .with_format(Format::image2(caps.formats)?);

        info!("Extracting {} thumbnail from {}", format, source);
        FfmpegCommand::new([input], [output])
            .run(self.toolchain())
            .await
    }

    /// Writes only the audio of `source` to `output`, copied unless an
    /// encoder is given. Chapters are dropped.
    pub async fn extract_audio(
        &self,
        source: &str,
        output: &str,
        format: Option<&str>,
        encoder: Option<&str>,
        channels: Option<u32>,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;

        let audio = match encoder {
            Some(name) => {
                let audio = Audio::new(name, caps.encoders)?;
                match channels {
                    Some(n) => audio.with_channels(n),
                    None => audio,
                }
            }
            None => Audio::copy(),
        };
        let output = with_format(
            Output::new(output)
                .with_stream(Video::disabled())
                .with_stream(Subtitle::disabled())
                .with_stream(audio)
                .with_extra(["-map_chapters", "-1"]),
            format,
            &caps,
        )?;

        info!("Extracting audio from {} to {}", source, output.target());
        self.run(input, output).await
    }

    /// Copies `source` to `output` without its audio, and without
    /// subtitles unless `remove_subtitles` is false. Chapters are dropped.
    pub async fn remove_audio(
        &self,
        source: &str,
        output: &str,
        format: Option<&str>,
        remove_subtitles: bool,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;

        let subtitles = if remove_subtitles {
            Subtitle::disabled()
        } else {
            Subtitle::copy()
        };
        let output = with_format(
            Output::new(output)
                .with_stream(Video::copy())
                .with_stream(subtitles)
                .with_stream(Audio::disabled())
                .with_extra(["-map_chapters", "-1"]),
            format,
            &caps,
        )?;

        info!("Removing audio from {} into {}", source, output.target());
        self.run(input, output).await
    }

    /// MP4 with H.264 video and stereo AAC audio, without subtitles.
    pub async fn convert_to_h264(
        &self,
        source: &str,
        output: &str,
        options: &VideoConvertOptions,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;
        let video = Video::h264(caps.encoders, options.preset.as_deref(), options.crf)?;
        let output = mp4_video_output(output, video, options, &caps)?;

        info!("Converting {} to H.264", source);
        self.run(input, output).await
    }

    /// MP4 with H.265 video and stereo AAC audio, without subtitles.
    pub async fn convert_to_hevc(
        &self,
        source: &str,
        output: &str,
        options: &VideoConvertOptions,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;
        let video = Video::h265(caps.encoders, options.preset.as_deref(), options.crf)?;
        let output = mp4_video_output(output, video, options, &caps)?;

        info!("Converting {} to HEVC", source);
        self.run(input, output).await
    }

    /// WebM with constant quality VP9 video and stereo Opus audio, without
    /// subtitles.
    pub async fn convert_to_webm(
        &self,
        source: &str,
        output: &str,
        options: &VideoConvertOptions,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;

        let mut video =
            Video::vp9(caps.encoders, options.crf)?.with_extra(options.extra.iter().cloned());
        if let Some(scale) = &options.scale {
            video = video.with_scale(scale.clone());
        }
        let mut audio = Audio::opus(caps.encoders)?.with_channels(2);
        if let Some(bit_rate) = &options.audio_bit_rate {
            audio = audio.with_bit_rate(bit_rate.clone());
        }
        let output = Output::new(output)
            .with_stream(video)
            .with_stream(audio)
            .with_stream(Subtitle::disabled())
            .with_format(Format::webm(caps.formats)?);

        info!("Converting {} to WebM", source);
        self.run(input, output).await
    }

    /// Audio-only MP4 with AAC.
    pub async fn convert_to_aac(
        &self,
        source: &str,
        output: &str,
        options: &AudioConvertOptions,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;
        let audio = tune_audio(Audio::aac(caps.encoders)?, options);
        let output = audio_only_output(output, audio, Format::mp4(caps.formats, true)?);

        info!("Converting {} to AAC", source);
        self.run(input, output).await
    }

    /// Audio-only Ogg with Opus.
    pub async fn convert_to_opus(
        &self,
        source: &str,
        output: &str,
        options: &AudioConvertOptions,
    ) -> Result<(), ToolError> {
        let input = Input::new(source)?;
        let caps = self.directory.capabilities().await?;
        let audio = tune_audio(Audio::opus(caps.encoders)?, options);
        let output = audio_only_output(output, audio, Format::ogg(caps.formats)?);

        info!("Converting {} to Opus", source);
        self.run(input, output).await
    }

    async fn run(&self, input: Input, output: Output) -> Result<(), ToolError> {
        FfmpegCommand::new([input], [output])
            .run(self.toolchain())
            .await
            .map(|_| ())
    }
}

fn with_format(
    output: Output,
    format: Option<&str>,
    caps: &Capabilities<'_>,
) -> Result<Output, ToolError> {
    Ok(match format {
        Some(name) => output.with_format(Format::new(name, caps.formats)?),
        None => output,
    })
}

fn mp4_video_output(
    target: &str,
    mut video: Video,
    options: &VideoConvertOptions,
    caps: &Capabilities<'_>,
) -> Result<Output, ToolError> {
    if let Some(scale) = &options.scale {
        video = video.with_scale(scale.clone());
    }
    if let Some(bit_rate) = &options.video_bit_rate {
        video = video.with_bit_rate(bit_rate.clone());
    }
    video = video.with_extra(options.extra.iter().cloned());

    let mut audio = Audio::aac(caps.encoders)?.with_channels(2);
    if let Some(bit_rate) = &options.audio_bit_rate {
        audio = audio.with_bit_rate(bit_rate.clone());
    }

    Ok(Output::new(target)
        .with_stream(video)
        .with_stream(audio)
        .with_stream(Subtitle::disabled())
        .with_format(Format::mp4(caps.formats, true)?))
}

fn tune_audio(mut audio: Audio, options: &AudioConvertOptions) -> Audio {
    if let Some(channels) = options.channels {
        audio = audio.with_channels(channels);
    }
    if let Some(bit_rate) = &options.bit_rate {
        audio = audio.with_bit_rate(bit_rate.clone());
    }
    audio.with_extra(options.extra.iter().cloned())
}

fn audio_only_output(target: &str, audio: Audio, format: Format) -> Output {
    Output::new(target)
        .with_stream(audio)
        .with_stream(Video::disabled())
        .with_stream(Subtitle::disabled())
        .with_format(format)
}

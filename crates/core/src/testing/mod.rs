//! Testing utilities: a scripted process layer and canned tool output.
//!
//! Nothing here spawns a process, so the whole crate can be exercised
//! without ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ffkit_core::testing::{fixtures, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new();
//! fixtures::script_discovery(&runner);
//! let toolkit = Toolkit::with_runner(ToolsConfig::default(), Arc::new(runner.clone()))?;
//! ```

mod scripted_runner;

pub use scripted_runner::ScriptedRunner;

/// Canned tool output and helper constructors.
pub mod fixtures {
    use super::ScriptedRunner;
    use crate::capabilities::{EncoderTable, FormatTable};
    use crate::runner::{Tool, ToolOutput};

    /// Output of `ffmpeg -codecs` (abridged).
    pub const CODECS_LISTING: &str = "\
Codecs:
 D..... = Decoding supported
 .E.... = Encoding supported
 ..V... = Video codec
 ..A... = Audio codec
 ..S... = Subtitle codec
 ...I.. = Intra frame-only codec
 ....L. = Lossy compression
 .....S = Lossless compression
 -------
 D.VI.S 012v                 Uncompressed 4:2:2 10-bit
 DEV.LS h264                 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (decoders: h264 h264_v4l2m2m) (encoders: libx264 libx264rgb)
 DEV.L. hevc                 H.265 / HEVC (High Efficiency Video Coding) (encoders: libx265)
 DEVIL. mjpeg                Motion JPEG
 DEV..S png                  PNG (Portable Network Graphics) image
 DEV.L. theora               Theora (encoders: libtheora)
 DEV.L. vp9                  Google VP9 (decoders: vp9 libvpx-vp9) (encoders: libvpx-vp9)
 DEA.L. aac                  AAC (Advanced Audio Coding)
 DEA..S flac                 FLAC (Free Lossless Audio Codec)
 DEA.L. opus                 Opus (Opus Interactive Audio Codec) (encoders: opus libopus)
 DEA.L. vorbis               Vorbis (encoders: vorbis libvorbis)
 DES... ass                  ASS (Advanced SSA) subtitle (decoders: ssa ass) (encoders: ssa ass)
 DES... subrip               SubRip subtitle (decoders: srt subrip) (encoders: srt subrip)
 D.D... bin_data             binary data
 broken-row
";

    /// Output of `ffmpeg -encoders` (abridged).
    pub const ENCODERS_LISTING: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 S..... = Subtitle
 .F.... = Frame-level multithreading
 ..S... = Slice-level multithreading
 ...X.. = Codec is experimental
 ....B. = Supports draw_horiz_band
 .....D = Supports direct rendering method 1
 ------
 V....D bmp                  BMP (Windows and OS/2 bitmap)
 V.S... gif                  GIF (Graphics Interchange Format)
 V.S... mjpeg                MJPEG (Motion JPEG)
 VFS... png                  PNG (Portable Network Graphics) image
 V....D tiff                 TIFF image
 V..... libtheora            libtheora Theora (codec theora)
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (codec h264)
 V....D libx265              libx265 H.265 / HEVC (codec hevc)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 V....D libaom-av1           libaom AV1 (codec av1)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D flac                 FLAC (Free Lossless Audio Codec)
 A....D libopus              libopus Opus (codec opus)
 A...X. vorbis               Vorbis
 S..... ass                  ASS (Advanced SubStation Alpha) subtitle
 S..... srt                  SubRip subtitle (codec subrip)
 S..... mov_text             3GPP Timed Text subtitle
";

    /// Output of `ffmpeg -formats` (abridged).
    pub const FORMATS_LISTING: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 D  aac             raw ADTS AAC (Advanced Audio Coding)
 DE image2          image2 sequence
  E ipod            iPod H.264 MP4 (MPEG-4 Part 14)
  E matroska        Matroska
 D  matroska,webm   Matroska / WebM
 DE mp3             MP3 (MPEG audio layer 3)
  E mp4             MP4 (MPEG-4 Part 14)
 DE ogg             Ogg
  E webm            WebM
 DE wav             WAV / WAVE (Waveform Audio)
";

    /// Output of `ffmpeg -version` (first lines).
    pub const FFMPEG_VERSION: &str = "\
ffmpeg version 4.1.2 Copyright (c) 2000-2019 the FFmpeg developers
built with gcc 8 (Debian 8.3.0-2)
configuration: --prefix=/usr --enable-gpl --enable-libx264
";

    /// Output of `ffprobe -version` (first lines).
    pub const FFPROBE_VERSION: &str = "\
ffprobe version 4.1.2 Copyright (c) 2007-2019 the FFmpeg developers
built with gcc 8 (Debian 8.3.0-2)
";

    /// `ffprobe -show_format -show_streams` output for a short Matroska
    /// file with video, audio, subtitles and a data stream.
    pub const SINTEL_PROBE: &str = r#"{
    "streams": [
        {
            "index": 0,
            "codec_name": "h264",
            "codec_long_name": "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
            "profile": "High",
            "codec_type": "video",
            "codec_time_base": "1/48",
            "width": 1280,
            "height": 544,
            "has_b_frames": 2,
            "sample_aspect_ratio": "1:1",
            "display_aspect_ratio": "40:17",
            "pix_fmt": "yuv420p",
            "r_frame_rate": "24/1",
            "avg_frame_rate": "24/1",
            "time_base": "1/1000",
            "start_time": "0.000000",
            "tags": {
                "DURATION": "00:00:05.000000000"
            }
        },
        {
            "index": 1,
            "codec_name": "ac3",
            "codec_long_name": "ATSC A/52A (AC-3)",
            "codec_type": "audio",
            "sample_fmt": "fltp",
            "sample_rate": "48000",
            "channels": 6,
            "channel_layout": "5.1(side)",
            "time_base": "1/1000",
            "start_time": "0.000000",
            "bit_rate": "448000",
            "tags": {
                "language": "eng"
            }
        },
        {
            "index": 2,
            "codec_name": "subrip",
            "codec_long_name": "SubRip subtitle",
            "codec_type": "subtitle",
            "time_base": "1/1000",
            "start_time": "0.000000",
            "duration_ts": 5024,
            "duration": "5.024000",
            "tags": {
                "language": "ger"
            }
        },
        {
            "index": 3,
            "codec_name": "bin_data",
            "codec_long_name": "binary data",
            "codec_type": "data",
            "codec_tag_string": "[0][0][0][0]",
            "time_base": "1/1000",
            "nb_frames": "12"
        }
    ],
    "format": {
        "filename": "sintel.mkv",
        "nb_streams": 4,
        "format_name": "matroska,webm",
        "format_long_name": "Matroska / WebM",
        "start_time": "0.000000",
        "duration": "5.024000",
        "size": "1668889",
        "bit_rate": "2657539",
        "probe_score": 100,
        "tags": {
            "title": "Sintel",
            "ENCODER": "Lavf58.20.100"
        }
    }
}"#;

    /// Probe output for a still image: no container duration and a
    /// degenerate `0/0` frame rate.
    pub const STILL_IMAGE_PROBE: &str = r#"{
    "streams": [
        {
            "index": 0,
            "codec_name": "png",
            "codec_long_name": "PNG (Portable Network Graphics) image",
            "codec_type": "video",
            "width": 320,
            "height": 240,
            "has_b_frames": 0,
            "display_aspect_ratio": "4:3",
            "pix_fmt": "rgb24",
            "r_frame_rate": "25/1",
            "avg_frame_rate": "0/0",
            "time_base": "1/25"
        }
    ],
    "format": {
        "filename": "frame.png",
        "nb_streams": 1,
        "format_name": "png_pipe",
        "format_long_name": "piped png sequence",
        "size": "5120",
        "probe_score": 99
    }
}"#;

    /// Answer every discovery query (codecs, encoders, formats, versions)
    /// with the canned listings.
    pub fn script_discovery(runner: &ScriptedRunner) {
        runner.respond(Tool::Ffmpeg, "-codecs", ToolOutput::success(CODECS_LISTING));
        runner.respond(Tool::Ffmpeg, "-encoders", ToolOutput::success(ENCODERS_LISTING));
        runner.respond(Tool::Ffmpeg, "-formats", ToolOutput::success(FORMATS_LISTING));
        runner.respond(Tool::Ffmpeg, "-version", ToolOutput::success(FFMPEG_VERSION));
        runner.respond(Tool::Ffprobe, "-version", ToolOutput::success(FFPROBE_VERSION));
    }

    /// Encoder table parsed from [`ENCODERS_LISTING`].
    pub fn encoders() -> EncoderTable {
        EncoderTable::parse_listing(ENCODERS_LISTING)
    }

    /// Format table parsed from [`FORMATS_LISTING`].
    pub fn formats() -> FormatTable {
        FormatTable::parse_listing(FORMATS_LISTING)
    }
}

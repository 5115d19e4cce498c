//! Decoding of `ffprobe -show_format -show_streams` JSON.

use chrono::TimeDelta;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::types::{
    AudioStream, CodecInfo, ContainerInfo, DataStream, MediaInfo, Rational, StreamBase,
    StreamInfo, StreamKind, SubtitleStream, VideoStream,
};
use crate::runner::ToolError;
use crate::time::parse_decimal_micros;

/// ffprobe prints most numbers as strings and a few as JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(v) => v.clone(),
        }
    }

    fn to_i64(&self, field: &str) -> Result<i64, ToolError> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => self.text().trim().parse().map_err(|_| invalid(field, self)),
        }
    }

    fn to_u64(&self, field: &str) -> Result<u64, ToolError> {
        u64::try_from(self.to_i64(field)?).map_err(|_| invalid(field, self))
    }

    fn to_time(&self, field: &str) -> Result<TimeDelta, ToolError> {
        parse_decimal_micros(&self.text())
            .map(TimeDelta::microseconds)
            .ok_or_else(|| invalid(field, self))
    }
}

fn invalid(field: &str, value: &Scalar) -> ToolError {
    ToolError::parse(format!("invalid {}: {:?}", field, value.text()))
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, ToolError> {
    value.ok_or_else(|| ToolError::parse(format!("missing {}", field)))
}

fn optional<T>(
    field: &str,
    value: Option<&Scalar>,
    convert: impl Fn(&Scalar, &str) -> Result<T, ToolError>,
) -> Result<Option<T>, ToolError> {
    value.map(|v| convert(v, field)).transpose()
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
    #[serde(default)]
    streams: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: String,
    format_long_name: Option<String>,
    start_time: Option<Scalar>,
    duration: Option<Scalar>,
    size: Option<Scalar>,
    bit_rate: Option<Scalar>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: u32,
    codec_name: Option<String>,
    codec_long_name: Option<String>,
    profile: Option<Scalar>,
    time_base: Option<String>,
    nb_frames: Option<Scalar>,
    start_time: Option<Scalar>,
    duration: Option<Scalar>,
    duration_ts: Option<Scalar>,
    bit_rate: Option<Scalar>,
    #[serde(default)]
    tags: HashMap<String, String>,

    width: Option<u32>,
    height: Option<u32>,
    display_aspect_ratio: Option<String>,
    pix_fmt: Option<String>,
    has_b_frames: Option<u32>,
    avg_frame_rate: Option<String>,

    channels: Option<u32>,
    channel_layout: Option<String>,
    sample_fmt: Option<String>,
    sample_rate: Option<Scalar>,
}

impl MediaInfo {
    /// Parses inspection output. Text that is not JSON means the tool did
    /// not recognise the source, reported as [`ToolError::NoMedia`].
    pub fn from_json(json: &str) -> Result<Self, ToolError> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| ToolError::no_media(format!("unreadable ffprobe output: {}", e)))?;
        Self::from_value(raw)
    }

    /// Builds the records from already decoded inspection output.
    pub fn from_value(raw: Value) -> Result<Self, ToolError> {
        let probe = ProbeOutput::deserialize(&raw)
            .map_err(|e| ToolError::parse(format!("unexpected ffprobe output: {}", e)))?;

        let format = parse_container(probe.format)?;
        let streams = probe
            .streams
            .iter()
            .map(parse_stream)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Parsed {} container with {} stream(s)",
            format.name,
            streams.len()
        );

        Ok(Self {
            raw,
            format,
            streams,
        })
    }
}

fn parse_container(format: ProbeFormat) -> Result<ContainerInfo, ToolError> {
    Ok(ContainerInfo {
        names: format.format_name.split(',').map(str::to_string).collect(),
        name: format.format_name,
        description: format.format_long_name,
        start_time: optional("start_time", format.start_time.as_ref(), Scalar::to_time)?,
        duration: optional("duration", format.duration.as_ref(), Scalar::to_time)?,
        size: optional("size", format.size.as_ref(), Scalar::to_u64)?,
        bit_rate: optional("bit_rate", format.bit_rate.as_ref(), Scalar::to_u64)?,
        tags: format.tags,
    })
}

/// Picks the variant from `codec_type` before anything else is read, so an
/// unsupported kind is reported as such even if its other fields are odd.
fn parse_stream(value: &Value) -> Result<StreamInfo, ToolError> {
    let kind: StreamKind = value
        .get("codec_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .parse()?;

    let stream = ProbeStream::deserialize(value)
        .map_err(|e| ToolError::parse(format!("unexpected stream entry: {}", e)))?;
    let base = parse_base(&stream, kind)?;

    Ok(match kind {
        StreamKind::Video => StreamInfo::Video(VideoStream {
            width: required("width", stream.width)?,
            height: required("height", stream.height)?,
            display_aspect_ratio: stream.display_aspect_ratio,
            pix_fmt: stream.pix_fmt,
            has_b_frames: stream.has_b_frames.unwrap_or(0),
            frame_rate: match stream.avg_frame_rate.as_deref() {
                Some(rate) => Rational::parse_lenient(rate)?,
                None => None,
            },
            base,
        }),
        StreamKind::Audio => StreamInfo::Audio(AudioStream {
            channels: required("channels", stream.channels)?,
            channel_layout: stream.channel_layout,
            sample_fmt: required("sample_fmt", stream.sample_fmt)?,
            sample_rate: {
                let rate = required("sample_rate", stream.sample_rate.as_ref())?;
                u32::try_from(rate.to_u64("sample_rate")?)
                    .map_err(|_| invalid("sample_rate", rate))?
            },
            base,
        }),
        StreamKind::Subtitle => StreamInfo::Subtitle(SubtitleStream {
            language: base.tags.get("language").cloned(),
            base,
        }),
        StreamKind::Data => StreamInfo::Data(DataStream {
            raw: value.as_object().cloned().unwrap_or_default(),
            base,
        }),
    })
}

fn parse_base(stream: &ProbeStream, kind: StreamKind) -> Result<StreamBase, ToolError> {
    let time_base: Rational = required("time_base", stream.time_base.as_deref())?.parse()?;

    Ok(StreamBase {
        codec: CodecInfo {
            name: required("codec_name", stream.codec_name.clone())?,
            kind,
            description: stream.codec_long_name.clone(),
            profile: stream.profile.as_ref().map(Scalar::text),
        },
        index: stream.index,
        time_base,
        frame_count: optional("nb_frames", stream.nb_frames.as_ref(), Scalar::to_u64)?,
        start_time: optional("start_time", stream.start_time.as_ref(), Scalar::to_time)?,
        duration: optional("duration", stream.duration.as_ref(), Scalar::to_time)?,
        duration_ts: optional("duration_ts", stream.duration_ts.as_ref(), Scalar::to_i64)?,
        bit_rate: optional("bit_rate", stream.bit_rate.as_ref(), Scalar::to_u64)?,
        tags: stream.tags.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use serde_json::json;

    fn stream_json(kind: &str) -> Value {
        json!({
            "format": {"format_name": "matroska,webm"},
            "streams": [{
                "index": 0,
                "codec_name": "x",
                "codec_type": kind,
                "time_base": "1/1000"
            }]
        })
    }

    #[test]
    fn test_full_document() {
        let info = MediaInfo::from_json(fixtures::SINTEL_PROBE).unwrap();

        assert_eq!(info.format.name, "matroska,webm");
        assert_eq!(info.format.names, vec!["matroska", "webm"]);
        assert_eq!(info.format.description.as_deref(), Some("Matroska / WebM"));
        assert_eq!(info.format.duration, Some(TimeDelta::microseconds(5_024_000)));
        assert_eq!(info.format.start_time, Some(TimeDelta::zero()));
        assert_eq!(info.format.size, Some(1_668_889));
        assert_eq!(info.format.bit_rate, Some(2_657_539));
        assert_eq!(info.format.tags.get("title").map(String::as_str), Some("Sintel"));

        assert_eq!(info.streams.len(), 4);
        assert!(info.has_video() && info.has_audio() && info.has_subtitles());
        assert_eq!(info.raw["format"]["probe_score"], 100);
    }

    #[test]
    fn test_video_stream() {
        let info = MediaInfo::from_json(fixtures::SINTEL_PROBE).unwrap();
        let video = info.video_streams()[0];

        assert_eq!((video.width, video.height), (1280, 544));
        assert_eq!(video.display_aspect_ratio.as_deref(), Some("40:17"));
        assert_eq!(video.pix_fmt.as_deref(), Some("yuv420p"));
        assert_eq!(video.has_b_frames, 2);
        assert_eq!(video.frame_rate, Rational::new(24, 1));
        assert_eq!(video.base.codec.name, "h264");
        assert_eq!(video.base.codec.profile.as_deref(), Some("High"));
        assert_eq!(video.base.time_base, Rational::new(1, 1000).unwrap());
        assert_eq!(video.base.duration, None);
    }

    #[test]
    fn test_audio_stream() {
        let info = MediaInfo::from_json(fixtures::SINTEL_PROBE).unwrap();
        let audio = info.audio_streams()[0];

        assert_eq!(audio.channels, 6);
        assert_eq!(audio.channel_layout.as_deref(), Some("5.1(side)"));
        assert_eq!(audio.sample_fmt, "fltp");
        assert_eq!(audio.sample_rate, 48_000);
        assert_eq!(audio.base.bit_rate, Some(448_000));
        assert_eq!(audio.base.index, 1);
    }

    #[test]
    fn test_subtitle_and_data_streams() {
        let info = MediaInfo::from_json(fixtures::SINTEL_PROBE).unwrap();

        let subtitle = info.subtitle_streams()[0];
        assert_eq!(subtitle.language.as_deref(), Some("ger"));
        assert_eq!(subtitle.base.duration_ts, Some(5024));
        assert_eq!(subtitle.base.duration, Some(TimeDelta::microseconds(5_024_000)));

        match &info.streams[3] {
            StreamInfo::Data(data) => {
                assert_eq!(data.base.frame_count, Some(12));
                assert_eq!(data.raw["codec_tag_string"], "[0][0][0][0]");
            }
            other => panic!("expected data stream, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_fields_are_none() {
        let info = MediaInfo::from_json(fixtures::STILL_IMAGE_PROBE).unwrap();

        assert_eq!(info.format.duration, None);
        assert_eq!(info.format.start_time, None);
        assert_eq!(info.format.bit_rate, None);
        assert!(info.format.tags.is_empty());

        let video = info.video_streams()[0];
        assert_eq!(video.frame_rate, None);
        assert_eq!(video.base.frame_count, None);
        assert!(!info.has_audio());
    }

    #[test]
    fn test_negative_start_time() {
        let mut doc = stream_json("audio");
        doc["format"]["start_time"] = json!("-0.007000");
        doc["streams"][0]["channels"] = json!(2);
        doc["streams"][0]["sample_fmt"] = json!("fltp");
        doc["streams"][0]["sample_rate"] = json!("44100");

        let info = MediaInfo::from_value(doc).unwrap();
        assert_eq!(info.format.start_time, Some(TimeDelta::microseconds(-7_000)));
        assert_eq!(info.audio_streams()[0].sample_rate, 44_100);
    }

    #[test]
    fn test_unknown_stream_kind() {
        let err = MediaInfo::from_value(stream_json("attachment")).unwrap_err();
        assert!(matches!(err, ToolError::UnknownStreamKind { ref kind } if kind == "attachment"));
    }

    #[test]
    fn test_missing_required_field() {
        // Video without dimensions.
        let err = MediaInfo::from_value(stream_json("video")).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_not_json_is_no_media() {
        let err = MediaInfo::from_json("Invalid data found when processing input").unwrap_err();
        assert!(err.is_unusable_source());
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let mut doc = stream_json("data");
        doc["format"]["size"] = json!("lots");
        let err = MediaInfo::from_value(doc).unwrap_err();
        assert!(matches!(err, ToolError::Parse { .. }));
    }

    #[test]
    fn test_out_of_range_rationals() {
        let mut doc = stream_json("data");
        doc["streams"][0]["time_base"] = json!("-9223372036854775808/-1");
        let err = MediaInfo::from_value(doc).unwrap_err();
        assert!(matches!(err, ToolError::Parse { .. }));

        let mut doc = stream_json("video");
        doc["streams"][0]["width"] = json!(640);
        doc["streams"][0]["height"] = json!(480);
        doc["streams"][0]["avg_frame_rate"] = json!("-9223372036854775808/-1");
        let info = MediaInfo::from_value(doc).unwrap();
        assert_eq!(info.video_streams()[0].frame_rate, None);
    }
}

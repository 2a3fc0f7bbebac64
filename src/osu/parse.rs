use super::{
    MAX_KEY_COUNT, MIN_KEY_COUNT, ParseError, Result,
    model::{HitObject, HitObjectKind, OsuChart, OsuMetadata, TimingPoint, TimingPointKind},
};

/// Type bit of a tap note.
const TYPE_CIRCLE: u32 = 1 << 0;
/// Type bit of a mania hold note.
const TYPE_MANIA_HOLD: u32 = 1 << 7;
/// Horizontal playfield width the column index is derived from.
const PLAYFIELD_WIDTH: f64 = 512.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    KeyValue(KeyValueSection),
    Events,
    TimingPoints,
    HitObjects,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyValueSection {
    General,
    Metadata,
    Difficulty,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name {
            "General" => Self::KeyValue(KeyValueSection::General),
            "Metadata" => Self::KeyValue(KeyValueSection::Metadata),
            "Difficulty" => Self::KeyValue(KeyValueSection::Difficulty),
            "Events" => Self::Events,
            "TimingPoints" => Self::TimingPoints,
            "HitObjects" => Self::HitObjects,
            _ => Self::Skipped,
        }
    }
}

/// Intermediate store for the key-value sections until all of them are seen.
#[derive(Debug, Default)]
struct MetadataBuilder {
    title: Option<String>,
    title_unicode: Option<String>,
    artist: Option<String>,
    artist_unicode: Option<String>,
    creator: Option<String>,
    version: Option<String>,
    audio_filename: Option<String>,
    audio_lead_in_ms: Option<f64>,
    key_count: Option<u8>,
    background: Option<String>,
}

impl MetadataBuilder {
    fn finish(self, format_version: u32) -> Result<OsuMetadata> {
        let key_count = self.key_count.ok_or(ParseError::MissingField {
            section: "Difficulty",
            field: "CircleSize",
        })?;
        Ok(OsuMetadata {
            format_version,
            title: non_empty(self.title_unicode).or(non_empty(self.title)).unwrap_or_default(),
            artist: non_empty(self.artist_unicode)
                .or(non_empty(self.artist))
                .unwrap_or_default(),
            creator: self.creator.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            audio_filename: self.audio_filename.unwrap_or_default(),
            audio_lead_in_ms: self.audio_lead_in_ms.unwrap_or(0.0),
            key_count,
            background: self.background,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

pub(super) fn parse(source: &str) -> Result<OsuChart> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()));

    let format_version = lines
        .by_ref()
        .find(|&(_, line)| !line.is_empty() && !line.starts_with("//"))
        .and_then(|(_, line)| line.strip_prefix("osu file format v"))
        .and_then(|rest| rest.trim().parse().ok())
        .ok_or(ParseError::MissingFormatHeader)?;

    let mut builder = MetadataBuilder::default();
    let mut timing_points = Vec::new();
    let mut hit_object_lines = Vec::new();
    let mut section = Section::Skipped;

    for (number, line) in lines {
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = Section::from_name(name);
            continue;
        }
        match section {
            Section::KeyValue(kind) => {
                let (key, value) = line
                    .split_once(':')
                    .ok_or(ParseError::InvalidKeyValue { line: number })?;
                read_key_value(&mut builder, kind, key.trim(), value.trim(), number)?;
            }
            Section::Events => read_event(&mut builder, line),
            Section::TimingPoints => timing_points.push(read_timing_point(line, number)?),
            // Hit objects need the key count from [Difficulty], which may come later in the file.
            Section::HitObjects => hit_object_lines.push((number, line)),
            Section::Skipped => {}
        }
    }

    let metadata = builder.finish(format_version)?;
    let mut hit_objects = hit_object_lines
        .into_iter()
        .map(|(number, line)| read_hit_object(line, number, metadata.key_count))
        .collect::<Result<Vec<_>>>()?;

    timing_points.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    hit_objects.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

    Ok(OsuChart {
        metadata,
        timing_points,
        hit_objects,
    })
}

fn read_key_value(
    builder: &mut MetadataBuilder,
    section: KeyValueSection,
    key: &str,
    value: &str,
    line: usize,
) -> Result<()> {
    match (section, key) {
        (KeyValueSection::General, "AudioFilename") => {
            builder.audio_filename = Some(value.into());
        }
        (KeyValueSection::General, "AudioLeadIn") => {
            builder.audio_lead_in_ms = Some(parse_finite(value, line)?);
        }
        (KeyValueSection::General, "Mode") => {
            let mode = parse_finite(value, line)? as u32;
            if mode != 3 {
                return Err(ParseError::NotManiaMode { mode });
            }
        }
        (KeyValueSection::Metadata, "Title") => builder.title = Some(value.into()),
        (KeyValueSection::Metadata, "TitleUnicode") => builder.title_unicode = Some(value.into()),
        (KeyValueSection::Metadata, "Artist") => builder.artist = Some(value.into()),
        (KeyValueSection::Metadata, "ArtistUnicode") => builder.artist_unicode = Some(value.into()),
        (KeyValueSection::Metadata, "Creator") => builder.creator = Some(value.into()),
        (KeyValueSection::Metadata, "Version") => builder.version = Some(value.into()),
        (KeyValueSection::Difficulty, "CircleSize") => {
            let count = parse_finite(value, line)?.round() as i64;
            if !(i64::from(MIN_KEY_COUNT)..=i64::from(MAX_KEY_COUNT)).contains(&count) {
                return Err(ParseError::KeyCountOutOfRange { count });
            }
            builder.key_count = Some(count as u8);
        }
        _ => {}
    }
    Ok(())
}

/// Reads one `[Events]` line. Only the background image is interesting; storyboard commands and
/// video events are left to the client.
fn read_event(builder: &mut MetadataBuilder, line: &str) {
    let fields: Vec<_> = line.split(',').map(str::trim).collect();
    if fields.len() >= 3 && fields[0] == "0" && builder.background.is_none() {
        builder.background = Some(fields[2].trim_matches('"').into());
    }
}

fn read_timing_point(line: &str, number: usize) -> Result<TimingPoint> {
    let fields: Vec<_> = line.split(',').map(str::trim).collect();
    if fields.len() < 8 {
        return Err(ParseError::FieldCount {
            line: number,
            expected: 8,
            got: fields.len(),
        });
    }
    let time_ms = parse_finite(fields[0], number)?;
    let raw_beat_length = parse_finite(fields[1], number)?;
    let uninherited = fields[6] == "1";

    let kind = if uninherited {
        if raw_beat_length <= 0.0 {
            return Err(ParseError::InvalidNumber {
                line: number,
                value: fields[1].into(),
            });
        }
        TimingPointKind::Uninherited {
            beat_length_ms: raw_beat_length,
        }
    } else {
        // Negative-encoded: `-100 / raw` yields the velocity multiplier.
        if raw_beat_length >= 0.0 {
            return Err(ParseError::InvalidNumber {
                line: number,
                value: fields[1].into(),
            });
        }
        TimingPointKind::Inherited {
            velocity_multiplier: -100.0 / raw_beat_length,
        }
    };
    Ok(TimingPoint { time_ms, kind })
}

fn read_hit_object(line: &str, number: usize, key_count: u8) -> Result<HitObject> {
    let fields: Vec<_> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 {
        return Err(ParseError::FieldCount {
            line: number,
            expected: 5,
            got: fields.len(),
        });
    }
    let x = parse_finite(fields[0], number)?;
    let time_ms = parse_finite(fields[2], number)?;
    let object_type = parse_finite(fields[3], number)? as u32;

    // Keep the quotient wide until it is range-checked; narrowing first would let an
    // out-of-playfield x alias into a valid column.
    let column = (x.max(0.0) * f64::from(key_count) / PLAYFIELD_WIDTH).floor();
    if column >= f64::from(key_count) {
        return Err(ParseError::ColumnOutOfRange {
            line: number,
            column: column as u64,
            key_count,
        });
    }
    let column = column as u8;

    let (kind, sample) = if object_type & TYPE_MANIA_HOLD != 0 {
        let params = fields.get(5).copied().ok_or(ParseError::FieldCount {
            line: number,
            expected: 6,
            got: fields.len(),
        })?;
        let (end, hit_sample) =
            params
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidNumber {
                    line: number,
                    value: params.into(),
                })?;
        let end_ms = parse_finite(end, number)?;
        (HitObjectKind::Hold { end_ms }, sample_file(hit_sample))
    } else if object_type & TYPE_CIRCLE != 0 {
        let sample = fields.get(5).copied().and_then(sample_file);
        (HitObjectKind::Tap, sample)
    } else {
        return Err(ParseError::UnsupportedObjectType {
            line: number,
            object_type,
        });
    };

    Ok(HitObject {
        time_ms,
        column,
        kind,
        sample,
    })
}

/// Extracts the custom sample file name from a `normalSet:additionSet:index:volume:filename`
/// tuple. An empty name means the skin default and becomes `None`.
fn sample_file(hit_sample: &str) -> Option<String> {
    hit_sample
        .splitn(5, ':')
        .nth(4)
        .filter(|name| !name.is_empty())
        .map(Into::into)
}

fn parse_finite(value: &str, line: usize) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            value: value.into(),
        })
}

use mania_bmson::osu::{
    HitObjectKind, ParseError, TimingPointKind, parse_osu,
};
use pretty_assertions::assert_eq;

#[test]
fn parse_fixture_chart() {
    let source = include_str!("files/twilight_7k.osu");
    let chart = parse_osu(source).expect("must be parsed");

    assert_eq!(chart.metadata.format_version, 14);
    assert_eq!(chart.metadata.title, "Twilight Starfall");
    assert_eq!(chart.metadata.artist, "cloudfield");
    assert_eq!(chart.metadata.creator, "mapper42");
    assert_eq!(chart.metadata.version, "7K Hyper");
    assert_eq!(chart.metadata.audio_filename, "audio.mp3");
    assert_eq!(chart.metadata.audio_lead_in_ms, 500.0);
    assert_eq!(chart.metadata.key_count, 7);
    assert_eq!(chart.metadata.background.as_deref(), Some("bg.jpg"));

    assert_eq!(chart.timing_points.len(), 4);
    assert!(matches!(
        chart.timing_points[1].kind,
        TimingPointKind::Inherited { velocity_multiplier } if velocity_multiplier == 2.0
    ));
    assert!(matches!(
        chart.timing_points[2].kind,
        TimingPointKind::Inherited { velocity_multiplier } if velocity_multiplier == 0.5
    ));

    assert_eq!(chart.hit_objects.len(), 11);
    assert_eq!(chart.hit_objects[0].column, 0);
    assert_eq!(chart.hit_objects[2].sample.as_deref(), Some("kick.wav"));
    assert_eq!(
        chart.hit_objects[4].kind,
        HitObjectKind::Hold { end_ms: 2769.0 }
    );
    // Hit objects come out sorted by time.
    assert!(
        chart
            .hit_objects
            .windows(2)
            .all(|pair| pair[0].time_ms <= pair[1].time_ms)
    );
}

#[test]
fn missing_format_header() {
    assert_eq!(
        parse_osu("[General]\nMode: 3\n").err(),
        Some(ParseError::MissingFormatHeader)
    );
}

#[test]
fn bom_before_header_is_tolerated() {
    let source = "\u{feff}osu file format v14\n\n[Difficulty]\nCircleSize:7\n";
    let chart = parse_osu(source).expect("must be parsed");
    assert_eq!(chart.metadata.format_version, 14);
}

#[test]
fn non_mania_mode_rejected() {
    let source = "osu file format v14\n\n[General]\nMode: 0\n\n[Difficulty]\nCircleSize:4\n";
    assert_eq!(parse_osu(source).err(), Some(ParseError::NotManiaMode { mode: 0 }));
}

#[test]
fn key_count_out_of_range() {
    let source = "osu file format v14\n\n[General]\nMode: 3\n\n[Difficulty]\nCircleSize:20\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::KeyCountOutOfRange { count: 20 })
    );
}

#[test]
fn missing_key_count() {
    let source = "osu file format v14\n\n[General]\nMode: 3\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::MissingField {
            section: "Difficulty",
            field: "CircleSize"
        })
    );
}

#[test]
fn short_timing_point_line_rejected_with_its_line_number() {
    let source = "osu file format v14\n\n[Difficulty]\nCircleSize:7\n\n[TimingPoints]\n0,500,4,2\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::FieldCount {
            line: 7,
            expected: 8,
            got: 4
        })
    );
}

#[test]
fn non_numeric_field_rejected() {
    let source =
        "osu file format v14\n\n[Difficulty]\nCircleSize:7\n\n[TimingPoints]\nzero,500,4,2,0,100,1,0\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::InvalidNumber {
            line: 7,
            value: "zero".into()
        })
    );
}

#[test]
fn key_value_line_without_colon_rejected() {
    let source = "osu file format v14\n\n[General]\nAudioFilename audio.mp3\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::InvalidKeyValue { line: 4 })
    );
}

#[test]
fn column_out_of_playfield_rejected() {
    let source = "osu file format v14\n\n[Difficulty]\nCircleSize:7\n\n[HitObjects]\n512,192,0,1,0,0:0:0:0:\n";
    assert_eq!(
        parse_osu(source).err(),
        Some(ParseError::ColumnOutOfRange {
            line: 7,
            column: 7,
            key_count: 7
        })
    );
}

#[test]
fn unrecognized_sections_and_comments_are_skipped() {
    let source = "osu file format v14\n\n[Colours]\nCombo1: 1,2,3\n\n// a comment\n\n[Difficulty]\nCircleSize:5\n";
    let chart = parse_osu(source).expect("must be parsed");
    assert_eq!(chart.metadata.key_count, 5);
    assert_eq!(chart.hit_objects, vec![]);
}

#[test]
fn unicode_metadata_preferred_over_ascii() {
    let source = "osu file format v14\n\n[Metadata]\nTitle:Romanized\nTitleUnicode:ユニコード\nArtist:Artist\n\n[Difficulty]\nCircleSize:7\n";
    let chart = parse_osu(source).expect("must be parsed");
    assert_eq!(chart.metadata.title, "ユニコード");
    assert_eq!(chart.metadata.artist, "Artist");
}

#[test]
fn difficulty_after_hit_objects_still_applies() {
    // Sections may appear in any order; the column split needs CircleSize regardless.
    let source = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0,0:0:0:0:\n\n[Difficulty]\nCircleSize:7\n";
    let chart = parse_osu(source).expect("must be parsed");
    assert_eq!(chart.hit_objects[0].column, 3);
}

use back_on_truck_common::LocationSample;
use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 写真のEXIFからGPS座標を読む
pub fn extract_location(path: &Path) -> Result<LocationSample, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    let latitude = coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')
        .ok_or("No GPS latitude in EXIF")?;
    let longitude = coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')
        .ok_or("No GPS longitude in EXIF")?;

    Ok(LocationSample::new(latitude, longitude)?)
}

fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let degrees = match &field.value {
        Value::Rational(v) if v.len() >= 3 => {
            v[0].to_f64() + v[1].to_f64() / 60.0 + v[2].to_f64() / 3600.0
        }
        _ => return None,
    };

    // 参照(N/S, E/W)が無ければ正とみなす
    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Ascii(v) => v.first().and_then(|s| s.first()).copied(),
            _ => None,
        })
        .map(|c| c.eq_ignore_ascii_case(&negative_ref))
        .unwrap_or(false);

    Some(if negative { -degrees } else { degrees })
}

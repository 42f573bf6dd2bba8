use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ExportError;
use crate::types::geo::GeoPoint;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const LINE_STYLE_ID: &str = "yellowLineGreenPoly";
// aabbggrr with 50% alpha: yellow line, green fill.
const LINE_COLOR: &str = "7f00ffff";
const POLY_COLOR: &str = "7f00ff00";
const LINE_WIDTH: &str = "4";

// The KML keeps every point; only the map view is thinned.
pub fn kml_document(points: &[GeoPoint]) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, points).map_err(|err| ExportError::Kml(err.to_string()))?;
    String::from_utf8(writer.into_inner()).map_err(|err| ExportError::Kml(err.to_string()))
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    points: &[GeoPoint],
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;
    text_element(writer, "name", "Coordinates")?;
    text_element(writer, "description", "Coordinates")?;

    let mut style = BytesStart::new("Style");
    style.push_attribute(("id", LINE_STYLE_ID));
    writer.write_event(Event::Start(style))?;
    writer.write_event(Event::Start(BytesStart::new("LineStyle")))?;
    text_element(writer, "color", LINE_COLOR)?;
    text_element(writer, "width", LINE_WIDTH)?;
    writer.write_event(Event::End(BytesEnd::new("LineStyle")))?;
    writer.write_event(Event::Start(BytesStart::new("PolyStyle")))?;
    text_element(writer, "color", POLY_COLOR)?;
    writer.write_event(Event::End(BytesEnd::new("PolyStyle")))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;

    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    text_element(writer, "name", "Absolute Extruded")?;
    text_element(writer, "description", "Transparent green wall with yellow outlines")?;
    text_element(writer, "styleUrl", &format!("#{}", LINE_STYLE_ID))?;
    writer.write_event(Event::Start(BytesStart::new("LineString")))?;
    text_element(writer, "extrude", "1")?;
    text_element(writer, "tessellate", "1")?;
    text_element(writer, "altitudeMode", "clampedToGround")?;

    let coordinates = points
        .iter()
        .map(|point| format!("{},{},0", point.lon, point.lat))
        .collect::<Vec<_>>()
        .join("\n");
    text_element(writer, "coordinates", &coordinates)?;

    writer.write_event(Event::End(BytesEnd::new("LineString")))?;
    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;
    Ok(())
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

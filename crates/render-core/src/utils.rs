use banded_style::{Font, FontStyle};

/// Face name with the conventional style suffix of the base-14 PDF fonts,
/// e.g. `Helvetica-BoldOblique`.
pub fn styled_face_name(base_name: &str, style: FontStyle) -> String {
    let mut name = base_name.to_string();
    if style.is_bold() || style.is_italic() {
        name.push('-');
        if style.is_bold() && style.is_italic() {
            name.push_str("BoldOblique");
        } else if style.is_bold() {
            name.push_str("Bold");
        } else {
            name.push_str("Oblique");
        }
    }
    name
}

/// The styled name of the font's primary face.
pub fn primary_face(font: &Font) -> String {
    styled_face_name(font.face(), font.style)
}

//! Vertical fit checks used by the pagination loop.

use crate::error::LayoutError;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Checks whether a band of `band_height` drawn at `cursor_y` ends above
/// `limit` (the top of the footer).
///
/// A band that would end exactly on the limit still fits.
pub fn check_band_fit(cursor_y: f32, band_height: f32, limit: f32) -> BreakAnalysis {
    let available = (limit - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: cursor_y + band_height > limit,
        remaining_height: available,
    }
}

/// The summary only stays on the current page when it is strictly shorter
/// than the space left above the footer.
pub fn summary_fits(cursor_y: f32, summary_height: f32, limit: f32) -> bool {
    summary_height < limit - cursor_y
}

/// Fails when a body band can never fit between header and footer, which
/// would otherwise break pages forever.
pub fn ensure_body_fits(
    band: &str,
    body_height: f32,
    page_height: f32,
    header_height: f32,
    footer_height: f32,
) -> Result<(), LayoutError> {
    let available = page_height - header_height - footer_height;
    if body_height > available {
        return Err(LayoutError::BandTooTall {
            band: band.to_string(),
            height: body_height,
            available,
        });
    }
    Ok(())
}

/// How many body rows fit on one page between header and footer.
pub fn rows_per_page(
    page_height: f32,
    header_height: f32,
    footer_height: f32,
    body_height: f32,
) -> Option<usize> {
    if body_height <= 0.0 {
        return None;
    }
    let available = page_height - header_height - footer_height;
    if available < body_height {
        return Some(0);
    }
    Some((available / body_height).floor() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_fit_is_inclusive_at_the_limit() {
        let fit = check_band_fit(272.0, 5.0, 277.0);
        assert!(!fit.should_break);
        assert_eq!(fit.remaining_height, 5.0);

        let fit = check_band_fit(273.0, 5.0, 277.0);
        assert!(fit.should_break);
    }

    #[test]
    fn test_summary_fit_is_strict() {
        assert!(!summary_fits(257.0, 20.0, 277.0));
        assert!(summary_fits(256.0, 20.0, 277.0));
    }

    #[test]
    fn test_body_too_tall() {
        assert!(ensure_body_fits("body", 257.0, 297.0, 20.0, 20.0).is_ok());
        let err = ensure_body_fits("body", 258.0, 297.0, 20.0, 20.0).unwrap_err();
        assert!(err.to_string().contains("Band 'body'"));
    }

    #[test]
    fn test_rows_per_page() {
        assert_eq!(rows_per_page(297.0, 20.0, 20.0, 5.0), Some(51));
        assert_eq!(rows_per_page(297.0, 20.0, 20.0, 0.0), None);
        assert_eq!(rows_per_page(50.0, 20.0, 20.0, 15.0), Some(0));
    }
}

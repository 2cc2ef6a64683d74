//! The flat response object handed to dynamic callers
//!
//! Every field is optional. A finished glyph fills all of them (except
//! `lineHeight` for icons); an empty outcome fills none, and callers detect
//! it by the missing `data`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use glyphsdf_core::types::{GlyphOutcome, GlyphResult};
use serde::{Deserialize, Serialize};

/// Glyph bytes plus metrics, keyed the way JavaScript callers expect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphResponse {
    /// Packed pixels, base64 in JSON
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Contour count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub em_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance: Option<f64>,
}

impl GlyphResponse {
    /// No data means the pipeline had nothing to draw
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }
}

impl From<GlyphResult> for GlyphResponse {
    fn from(result: GlyphResult) -> Self {
        Self {
            width: Some(result.bitmap.width),
            height: Some(result.bitmap.height),
            shape_size: Some(result.contour_count),
            line_height: result.line_height,
            em_size: Some(result.em_size),
            r: Some(result.bounds.right),
            l: Some(result.bounds.left),
            t: Some(result.bounds.top),
            b: Some(result.bounds.bottom),
            advance: Some(result.advance),
            data: Some(result.bitmap.into_data()),
        }
    }
}

impl From<GlyphOutcome> for GlyphResponse {
    fn from(outcome: GlyphOutcome) -> Self {
        match outcome {
            GlyphOutcome::Ready(result) => result.into(),
            GlyphOutcome::Empty(reason) => {
                log::debug!("Empty response: {reason}");
                Self::default()
            },
        }
    }
}

mod base64_bytes {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphsdf_core::types::{BoundingBox, EmptyReason, PixelFormat, ResultBitmap};

    fn sample() -> GlyphResult {
        GlyphResult {
            bitmap: ResultBitmap {
                data: vec![0, 64, 128, 255],
                width: 1,
                height: 1,
                format: PixelFormat::Sdf,
            },
            contour_count: 1,
            line_height: Some(38.4),
            em_size: 32.0,
            bounds: BoundingBox::new(1.2, -2.0, 30.8, 24.4),
            advance: 1000.0,
        }
    }

    #[test]
    fn test_ready_fills_every_field() {
        let response = GlyphResponse::from(GlyphOutcome::Ready(sample()));
        assert!(!response.is_empty());
        assert_eq!(response.width, Some(1));
        assert_eq!(response.shape_size, Some(1));
        assert_eq!(response.l, Some(1.2));
        assert_eq!(response.t, Some(24.4));
        assert_eq!(response.advance, Some(1000.0));
    }

    #[test]
    fn test_json_shape() {
        let response = GlyphResponse::from(sample());
        let json = match serde_json::to_value(&response) {
            Ok(v) => v,
            Err(e) => unreachable!("serialize failed: {e}"),
        };
        assert_eq!(json["data"], "AECA/w==");
        assert_eq!(json["shapeSize"], 1);
        assert_eq!(json["emSize"], 32.0);
        assert_eq!(json["lineHeight"], 38.4);

        let back: GlyphResponse = match serde_json::from_value(json) {
            Ok(r) => r,
            Err(e) => unreachable!("deserialize failed: {e}"),
        };
        assert_eq!(back, response);
    }

    #[test]
    fn test_empty_has_no_fields() {
        let response = GlyphResponse::from(GlyphOutcome::Empty(EmptyReason::GeometryUnresolved));
        assert!(response.is_empty());
        let json = match serde_json::to_string(&response) {
            Ok(s) => s,
            Err(e) => unreachable!("serialize failed: {e}"),
        };
        assert_eq!(json, "{}");
    }
}

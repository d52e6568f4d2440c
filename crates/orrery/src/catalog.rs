//! Body catalog loaded once at startup.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-body properties from `planet_properties.json`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodyProperties {
    /// Render radius in dataset units (km). Falls back to the configured default.
    #[serde(default)]
    pub render_radius: Option<f64>,
    /// Display color as `#rrggbb`.
    #[serde(default)]
    pub color: Option<String>,
}

impl BodyProperties {
    /// Parses [`Self::color`] into linear `[r, g, b]` in `[0, 1]`.
    pub fn color_rgb(&self) -> Option<[f32; 3]> {
        let hex = self.color.as_deref()?.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|c| c as f32 / 255.0)
        };
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

/// Read-only, name-ordered list of bodies.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bodies: BTreeMap<String, BodyProperties>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let bodies: BTreeMap<String, BodyProperties> = serde_json::from_str(json)?;
        if bodies.is_empty() {
            log::warn!("Body catalog is empty");
        }
        Ok(Self { bodies })
    }

    /// Catalog with default properties for every name.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bodies: names
                .into_iter()
                .map(|n| (n.into(), BodyProperties::default()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BodyProperties> {
        self.bodies.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BodyProperties)> {
        self.bodies.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_properties_and_ignores_unknown_keys() {
        let json = r##"{
            "Sun":   { "render_radius": 696000.0, "color": "#ffff00", "mass": 1.989e30 },
            "Earth": { "color": "#3366ff" },
            "Mars":  {}
        }"##;
        let catalog = Catalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("Sun").unwrap().render_radius, Some(696000.0));
        assert_eq!(catalog.get("Earth").unwrap().render_radius, None);
        assert_eq!(catalog.get("Sun").unwrap().color_rgb(), Some([1.0, 1.0, 0.0]));
        assert!(catalog.get("Mars").unwrap().color_rgb().is_none());

        let names: Vec<_> = catalog.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Earth", "Mars", "Sun"]);
    }

    #[test]
    fn malformed_colors_are_ignored() {
        let props = BodyProperties {
            render_radius: None,
            color: Some("#12345".into()),
        };
        assert!(props.color_rgb().is_none());

        let props = BodyProperties {
            render_radius: None,
            color: Some("#zz0000".into()),
        };
        assert!(props.color_rgb().is_none());
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(Catalog::from_json_str("[1, 2, 3]").is_err());
    }
}

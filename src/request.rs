use itertools::Itertools;

use crate::canonicalize::{QueryLike, QueryParams};
use crate::latlng::LatLng;
use crate::param::{ImageFormat, MapType, Param};

/// Description of a static map image.
///
/// Every field is optional: empty strings, zero numbers and `None` are left
/// out of the encoded query entirely.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapRequest {
    /// Center of the map, either an address or a `"lat,lng"` pair.
    pub center: String,
    /// Zoom level. Zero leaves it to the service.
    pub zoom: u32,
    /// Image dimensions as `"WxH"`, e.g. `"600x400"`.
    pub size: String,
    /// Pixel density multiplier. Zero leaves it to the service.
    pub scale: u32,
    /// Image format. The service defaults to PNG.
    pub format: Option<ImageFormat>,
    /// Rendering style. The service defaults to a road map.
    pub map_type: Option<MapType>,
    /// Language used for labels on the map tiles.
    pub language: String,
    /// Region used to pick borders and labels.
    pub region: String,
    /// Markers drawn on the map.
    pub markers: Option<Markers>,
    /// Path overlaid on the map.
    pub path: Option<Path>,
    /// Locations which must remain visible, without markers.
    pub visible: Vec<LatLng>,
    /// Custom feature style, passed through verbatim.
    pub style: String,
}

impl MapRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the center, as an address or `"lat,lng"`.
    pub fn with_center(mut self, center: impl Into<String>) -> Self {
        self.center = center.into();
        self
    }
    /// Sets the zoom level.
    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom;
        self
    }
    /// Sets the image dimensions, e.g. `"600x400"`.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }
    /// Sets the pixel density multiplier.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }
    /// Sets the image format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }
    /// Sets the map type.
    pub fn with_map_type(mut self, map_type: MapType) -> Self {
        self.map_type = Some(map_type);
        self
    }
    /// Sets the label language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
    /// Sets the region bias.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
    /// Sets the marker group.
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = Some(markers);
        self
    }
    /// Sets the path overlay.
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }
    /// Adds a location that must stay in view.
    pub fn with_visible(mut self, location: LatLng) -> Self {
        self.visible.push(location);
        self
    }
    /// Sets the custom feature style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// Shared style of a group of markers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// `tiny`, `mid` or `small`.
    pub size: String,
    /// Named colour or `0xRRGGBB`.
    pub color: String,
    /// Single uppercase letter or digit.
    pub label: String,
}

/// A group of markers sharing one style.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Markers {
    /// Style shared by every marker in the group.
    pub style: MarkerStyle,
    /// Marker positions, in drawing order.
    pub locations: Vec<LatLng>,
}

impl Markers {
    /// Creates an empty marker group.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the marker size.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.style.size = size.into();
        self
    }
    /// Sets the marker colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = color.into();
        self
    }
    /// Sets the marker label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.style.label = label.into();
        self
    }
    /// Adds a marker position.
    pub fn with_location(mut self, location: impl Into<LatLng>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Renders the composite `markers` value: style tokens then locations,
    /// all separated by `|`.
    pub fn to_param_value(&self) -> String {
        let style = &self.style;
        let tokens = [
            ("color", style.color.as_str()),
            ("size", style.size.as_str()),
            ("label", style.label.as_str()),
        ];
        composite(&tokens, &self.locations)
    }
}

/// Style of a path overlay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathStyle {
    /// Stroke width in pixels. Zero leaves it to the service.
    pub weight: u32,
    /// Stroke colour.
    pub color: String,
    /// Fill colour of the enclosed area, if the path is closed.
    pub fill_color: String,
    /// Follow the curvature of the Earth between points.
    pub geodesic: bool,
}

/// A path through two or more points.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    /// Stroke and fill style.
    pub style: PathStyle,
    /// Points, in drawing order.
    pub points: Vec<LatLng>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the stroke width.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.style.weight = weight;
        self
    }
    /// Sets the stroke colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = color.into();
        self
    }
    /// Sets the fill colour.
    pub fn with_fill_color(mut self, fill_color: impl Into<String>) -> Self {
        self.style.fill_color = fill_color.into();
        self
    }
    /// Controls geodesic interpolation between points.
    pub fn with_geodesic(mut self, geodesic: bool) -> Self {
        self.style.geodesic = geodesic;
        self
    }
    /// Adds a point to the end of the path.
    pub fn with_point(mut self, point: impl Into<LatLng>) -> Self {
        self.points.push(point.into());
        self
    }

    /// Renders the composite `path` value: style tokens then points, all
    /// separated by `|`.
    pub fn to_param_value(&self) -> String {
        let style = &self.style;
        let weight = if style.weight != 0 {
            style.weight.to_string()
        } else {
            String::new()
        };
        let tokens = [
            ("weight", weight.as_str()),
            ("color", style.color.as_str()),
            ("fillcolor", style.fill_color.as_str()),
            ("geodesic", if style.geodesic { "true" } else { "" }),
        ];
        composite(&tokens, &self.points)
    }
}

fn composite(style: &[(&str, &str)], points: &[LatLng]) -> String {
    style
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}:{}", key, value))
        .chain(points.iter().map(LatLng::to_string))
        .join("|")
}

impl QueryLike for MapRequest {
    fn query_params(&self) -> QueryParams {
        let mut q = QueryParams::new();

        if !self.center.is_empty() {
            q.set_param(Param::Center, self.center.as_str());
        }
        if self.zoom != 0 {
            q.set_param(Param::Zoom, self.zoom.to_string());
        }
        if !self.size.is_empty() {
            q.set_param(Param::Size, self.size.as_str());
        }
        if self.scale != 0 {
            q.set_param(Param::Scale, self.scale.to_string());
        }
        if let Some(format) = self.format {
            q.set_param(Param::Format, format.as_str());
        }
        if let Some(map_type) = self.map_type {
            q.set_param(Param::MapType, map_type.as_str());
        }
        if !self.language.is_empty() {
            q.set_param(Param::Language, self.language.as_str());
        }
        if !self.region.is_empty() {
            q.set_param(Param::Region, self.region.as_str());
        }

        // Composites that render to nothing are dropped
        let markers = self.markers.as_ref().map(Markers::to_param_value);
        if let Some(markers) = markers.filter(|v| !v.is_empty()) {
            q.set_param(Param::Markers, markers);
        }
        let path = self.path.as_ref().map(Path::to_param_value);
        if let Some(path) = path.filter(|v| !v.is_empty()) {
            q.set_param(Param::Path, path);
        }

        if !self.visible.is_empty() {
            q.set_param(Param::Visible, self.visible.iter().join("|"));
        }
        if !self.style.is_empty() {
            q.set_param(Param::Style, self.style.as_str());
        }

        q
    }
}

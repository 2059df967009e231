//! The flat key-value form of a view, as carried in a URL.

use mandel_core::{Complex, Error, Size, ViewParameters};
use mandel_render::{RenderMode, RenderRequest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest canvas edge the server will draw.
pub const MAX_DIMENSION: usize = 4096;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    #[serde(default = "ViewQuery::default_iteration_depth")]
    pub iteration_depth: i32,
    #[serde(default = "ViewQuery::default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub real: f64,
    #[serde(default)]
    pub imaginary: f64,
    #[serde(
        default,
        deserialize_with = "parse_render_mode",
        serialize_with = "print_render_mode"
    )]
    pub render_mode: RenderMode,
    #[serde(default = "ViewQuery::default_width")]
    pub width: usize,
    #[serde(default = "ViewQuery::default_height")]
    pub height: usize,
}

/// Converter to parse RenderMode via string.
fn parse_render_mode<'de, D>(deserializer: D) -> Result<RenderMode, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    buf.parse().map_err(serde::de::Error::custom)
}

fn print_render_mode<S>(mode: &RenderMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(mode.as_str())
}

impl Default for ViewQuery {
    fn default() -> Self {
        ViewQuery::from_view(&ViewParameters::default(), RenderMode::default())
    }
}

impl ViewQuery {
    fn default_iteration_depth() -> i32 {
        1000
    }
    fn default_scale() -> f64 {
        4.0
    }
    fn default_width() -> usize {
        640
    }
    fn default_height() -> usize {
        480
    }

    /// Captures a view and the backend to draw it with.
    pub fn from_view(params: &ViewParameters, render_mode: RenderMode) -> Self {
        let Size { width, height } = params.size();
        ViewQuery {
            iteration_depth: params.iteration_depth(),
            scale: params.scale(),
            theta: params.theta(),
            real: params.centre().re,
            imaginary: params.centre().im,
            render_mode,
            width,
            height,
        }
    }

    /// Rebuilds the view. No validation happens here; renderers validate on draw.
    pub fn to_view(&self) -> ViewParameters {
        ViewParameters::new(
            self.iteration_depth,
            self.scale,
            self.theta,
            Complex::new(self.real, self.imaginary),
            Size {
                width: self.width,
                height: self.height,
            },
        )
    }

    /// Builds a render request, refusing canvases too large to serve.
    pub fn to_request(&self) -> Result<RenderRequest, Error> {
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(Error::InvalidArgument(format!(
                "canvas {}x{} exceeds {} pixels on a side",
                self.width, self.height, MAX_DIMENSION
            )));
        }
        Ok(RenderRequest {
            mode: self.render_mode,
            params: self.to_view(),
        })
    }

    pub fn encode(&self) -> Result<String, Error> {
        serde_urlencoded::to_string(self)
            .map_err(|err| Error::Internal(format!("query encoding error: {}", err)))
    }

    pub fn decode(query: &str) -> Result<Self, Error> {
        serde_urlencoded::from_str(query)
            .map_err(|err| Error::InvalidArgument(format!("query decoding error: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_the_default_view() {
        let q = ViewQuery::decode("").unwrap();
        assert_eq!(q, ViewQuery::default());
        assert_eq!(q.to_view(), ViewParameters::default());
        assert_eq!(q.render_mode, RenderMode::Cpu);
    }

    #[test]
    fn reads_the_url_keys() {
        let q = ViewQuery::decode(
            "iterationDepth=300&scale=0.01&theta=1.5&real=-0.745&imaginary=0.113&renderMode=cpu-parallel",
        )
        .unwrap();
        assert_eq!(q.iteration_depth, 300);
        assert_eq!(q.scale, 0.01);
        assert_eq!(q.theta, 1.5);
        assert_eq!(q.real, -0.745);
        assert_eq!(q.imaginary, 0.113);
        assert_eq!(q.render_mode, RenderMode::CpuParallel);
        assert_eq!((q.width, q.height), (640, 480));
    }

    #[test]
    fn rejects_unknown_render_modes() {
        assert!(matches!(
            ViewQuery::decode("renderMode=vulkan"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn round_trip_preserves_the_transform() {
        let mut params = ViewParameters::default();
        params.zoom_in_to(100.0, 37.0);
        params.rotate_left();
        params.rotate_left();
        params.scroll_down();
        params.zoom_in();
        params.increase_iteration_depth();
        params.set_imaginary(0.1 + 0.2);

        let encoded = ViewQuery::from_view(&params, RenderMode::WebGl)
            .encode()
            .unwrap();
        assert!(encoded.contains("renderMode=web-gl"), "{}", encoded);
        let decoded = ViewQuery::decode(&encoded).unwrap();
        assert_eq!(decoded.render_mode, RenderMode::WebGl);

        let rebuilt = decoded.to_view();
        for (x, y) in [(0.0, 0.0), (639.0, 479.0), (320.0, 240.0), (12.5, 400.0)] {
            assert_eq!(
                rebuilt.transform().apply_x(x, y),
                params.transform().apply_x(x, y)
            );
            assert_eq!(
                rebuilt.transform().apply_y(x, y),
                params.transform().apply_y(x, y)
            );
        }
        assert_eq!(rebuilt, params);
    }

    #[test]
    fn refuses_oversized_canvases() {
        let q = ViewQuery::decode("width=5000").unwrap();
        assert!(matches!(q.to_request(), Err(Error::InvalidArgument(_))));
        let q = ViewQuery::decode("width=800&height=600").unwrap();
        assert_eq!(q.to_request().unwrap().params.size().pixels(), 480000);
    }
}

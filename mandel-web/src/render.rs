use axum::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderName, StatusCode,
    },
    response::IntoResponse,
};
use mandel_core::{Error, Framebuffer};
use mandel_render::RenderServer;

use crate::ViewQuery;

const RENDER_TIME_HEADER: &str = "x-render-time-ms";

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render the view described by the query.
pub async fn render(
    server: &RenderServer,
    query: ViewQuery,
) -> axum::response::Result<impl IntoResponse> {
    let request = query.to_request().map_err(|err| {
        tracing::error!("request error: {:?}", err);
        status_for(&err)
    })?;

    let rendered = server
        .submit(request)
        .await
        .map_err(|err| {
            tracing::error!("render server error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|err| {
            tracing::error!("request error: {:?}", err);
            status_for(&err)
        })?;

    let png = encode_png(&rendered.framebuffer).map_err(|err| {
        tracing::error!("image serialization error: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "image/png")],
        [(CACHE_CONTROL, "max-age=3600")],
        [(
            HeaderName::from_static(RENDER_TIME_HEADER),
            format!("{:.3}", rendered.result.elapsed_ms),
        )],
        png,
    ))
}

/// Encodes a framebuffer as PNG bytes.
pub fn encode_png(framebuffer: &Framebuffer) -> Result<Vec<u8>, Error> {
    let image = image::DynamicImage::ImageRgba8(framebuffer.to_image()?);
    let mut buffer = std::io::Cursor::new(Vec::<u8>::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|err| Error::Internal(format!("png encoding error: {}", err)))?;
    Ok(buffer.into_inner())
}

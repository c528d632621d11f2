use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::header,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use imwarp::{
    image::{Image, ImageSize},
    imgproc::interpolation::InterpolationMode,
    io::{functional::decode_image_rgb8, png::encode_image_png_rgb8},
};

use crate::{
    config::ServeArgs,
    error::AppError,
    form::TransformForm,
    page::{render_page, Page},
    transform::{catalog, TransformKind, Transformation},
};

/// Shared, read-only state of the handlers.
#[derive(Clone, Copy, Debug)]
pub struct AppState {
    /// Resampling kernel for every warp.
    pub interpolation: InterpolationMode,
}

/// Builds the router with every route and the upload limit.
pub fn build_router(args: &ServeArgs) -> Router {
    let state = AppState {
        interpolation: args.interpolation,
    };

    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/v0/transform", post(transform_png))
        .route("/api/v0/transformations", get(list_transformations))
        .layer(DefaultBodyLimit::max(args.max_upload_bytes()))
        .with_state(state)
}

/// Applies `transformation` and logs it. Runs on the blocking pool.
fn apply_logged(
    transformation: &Transformation,
    original: &Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<Image<u8, 3>, AppError> {
    log::info!(
        "Applying {} to a {} image",
        transformation.describe(),
        original.size()
    );
    let start = Instant::now();
    let transformed = transformation.apply(original, interpolation)?;
    log::debug!("{} took {:?}", transformation.kind(), start.elapsed());
    Ok(transformed)
}

/// Fills `page` step by step, so a failure leaves everything known so far in it.
fn fill_result_page(
    page: &mut Page,
    upload: &[u8],
    form: &TransformForm,
    interpolation: InterpolationMode,
) -> Result<(), AppError> {
    let original = decode_image_rgb8(upload)?;
    page.size = Some(original.size());

    let transformation = form.transformation(original.size())?;
    page.transformation = Some(transformation);

    let transformed = apply_logged(&transformation, &original, interpolation)?;

    page.original_png = Some(encode_image_png_rgb8(&original)?);
    page.transformed_png = match transformation {
        Transformation::Original => None,
        _ => Some(encode_image_png_rgb8(&transformed)?),
    };
    Ok(())
}

async fn index() -> Html<String> {
    Html(render_page(&Page::prompt(TransformKind::Original)))
}

async fn submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    match submit_page(state, multipart).await {
        Ok(page) => Html(render_page(&page)).into_response(),
        Err((err, page)) => {
            let status = err.status();
            log::warn!("Rejected form: {err}");
            let page = Page {
                message: Some(err.to_string()),
                ..page
            };
            (status, Html(render_page(&page))).into_response()
        }
    }
}

/// Builds the result page. On error the returned page keeps the selected
/// kind, the entered values and a decodable upload.
async fn submit_page(state: AppState, multipart: Multipart) -> Result<Page, (AppError, Page)> {
    let mut form = TransformForm::from_multipart(multipart)
        .await
        .map_err(|err| (err, Page::default()))?;
    let Some(upload) = form.image.take() else {
        log::info!("No image uploaded");
        return Ok(Page::prompt(form.kind));
    };

    tokio::task::spawn_blocking(move || {
        let mut page = Page {
            kind: form.kind,
            ..Default::default()
        };
        let res = fill_result_page(&mut page, &upload, &form, state.interpolation);

        // an undecodable file is not sent back
        if page.size.is_some() {
            page.upload = Some(upload);
        }

        match res {
            Ok(()) => Ok(page),
            Err(err) => Err((err, page)),
        }
    })
    .await
    .map_err(|err| (AppError::from(err), Page::default()))?
}

async fn transform_png(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = TransformForm::from_multipart(multipart).await?;
    let Some(upload) = form.image.take() else {
        return Err(AppError::NoImage);
    };

    let png = tokio::task::spawn_blocking(move || {
        let original = decode_image_rgb8(&upload)?;
        let transformation = form.transformation(original.size())?;
        let transformed = apply_logged(&transformation, &original, state.interpolation)?;
        Ok::<_, AppError>(encode_image_png_rgb8(&transformed)?)
    })
    .await??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    width: Option<usize>,
    height: Option<usize>,
}

async fn list_transformations(Query(query): Query<CatalogQuery>) -> impl IntoResponse {
    let size = match (query.width, query.height) {
        (Some(width), Some(height)) => Some(ImageSize { width, height }),
        _ => None,
    };
    Json(catalog(size))
}

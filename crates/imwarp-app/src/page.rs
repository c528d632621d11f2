use base64::Engine;

use imwarp::image::ImageSize;

use crate::{
    form::{encode_image_data, IMAGE_DATA_FIELD, IMAGE_FIELD, TRANSFORMATION_FIELD},
    params::ParamRange,
    transform::{TransformKind, Transformation},
};

/// Prompt shown until an image is uploaded.
pub const UPLOAD_PROMPT: &str = "Please upload an image.";

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 0; display: flex; min-height: 100vh; }
    aside { width: 300px; padding: 20px; background-color: #f5f5f5; }
    main { flex: 1; padding: 20px; }
    label { display: block; margin: 12px 0 4px; font-weight: bold; }
    input, select { width: 100%; padding: 6px; box-sizing: border-box; }
    button { margin-top: 16px; background-color: #4CAF50; color: white; padding: 10px 15px; border: none; border-radius: 4px; cursor: pointer; }
    .results { display: flex; gap: 20px; flex-wrap: wrap; }
    figure { flex: 1; min-width: 280px; margin: 0; }
    figure img { width: 100%; height: auto; }
    figcaption { text-align: center; color: #555; margin-top: 6px; }
    .error { color: #b00020; }
"#;

/// Everything the page shows.
#[derive(Debug, Default)]
pub struct Page {
    /// The selected transformation kind.
    pub kind: TransformKind,
    /// The applied parameters, used as input values.
    pub transformation: Option<Transformation>,
    /// The size of the uploaded image.
    pub size: Option<ImageSize>,
    /// The uploaded file, sent back in a hidden field.
    pub upload: Option<Vec<u8>>,
    /// The original image as PNG.
    pub original_png: Option<Vec<u8>>,
    /// The transformed image as PNG; absent for `Original`.
    pub transformed_png: Option<Vec<u8>>,
    /// A prompt or error shown instead of the images.
    pub message: Option<String>,
}

impl Page {
    /// The empty page asking for an upload.
    pub fn prompt(kind: TransformKind) -> Self {
        Page {
            kind,
            message: Some(UPLOAD_PROMPT.to_string()),
            ..Default::default()
        }
    }
}

/// Escapes text for HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Wraps PNG bytes in a `data:` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

fn render_input(out: &mut String, range: &ParamRange, value: f32) {
    let max = if range.is_bounded() {
        format!(r#" max="{}""#, range.max)
    } else {
        String::new()
    };
    out.push_str(&format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min}"{max} step="{step}" value="{value}">"#,
        name = range.name,
        label = escape_html(range.label),
        min = range.min,
        step = range.step,
    ));
}

fn render_controls(out: &mut String, page: &Page) {
    out.push_str(r#"<form method="post" action="/" enctype="multipart/form-data">"#);

    out.push_str(&format!(
        r#"<label for="{IMAGE_FIELD}">Upload an image</label><input type="file" id="{IMAGE_FIELD}" name="{IMAGE_FIELD}" accept=".jpg,.jpeg,.png,image/jpeg,image/png">"#
    ));
    if let Some(upload) = &page.upload {
        out.push_str(&format!(
            r#"<input type="hidden" name="{IMAGE_DATA_FIELD}" value="{}">"#,
            encode_image_data(upload)
        ));
    }

    out.push_str(&format!(
        r#"<label for="{TRANSFORMATION_FIELD}">Select Transformation</label><select id="{TRANSFORMATION_FIELD}" name="{TRANSFORMATION_FIELD}" onchange="this.form.submit()">"#
    ));
    for kind in TransformKind::ALL {
        let selected = if kind == page.kind { " selected" } else { "" };
        out.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            kind.slug(),
            escape_html(kind.label())
        ));
    }
    out.push_str("</select>");

    if page.kind == TransformKind::Perspective {
        out.push_str(
            "<p>Specify the coordinates of four corners for perspective transformation:</p>",
        );
    }

    let ranges = page.kind.params(page.size);
    let values = match page.transformation {
        Some(t) if t.kind() == page.kind => t.values(),
        _ => ranges.iter().map(|r| r.default).collect(),
    };
    for (range, value) in ranges.iter().zip(values) {
        render_input(out, range, value);
    }

    out.push_str(r#"<button type="submit">Apply</button></form>"#);
}

fn render_figure(out: &mut String, png: &[u8], caption: &str) {
    out.push_str(&format!(
        r#"<figure><img src="{}" alt="{caption}"><figcaption>{caption}</figcaption></figure>"#,
        png_data_uri(png),
        caption = escape_html(caption),
    ));
}

/// Renders the whole page: the sidebar form and either the message or the
/// original and transformed images side by side.
pub fn render_page(page: &Page) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Image Transformations</title><style>{STYLE}</style></head><body><aside>"#
    ));
    render_controls(&mut out, page);
    out.push_str("</aside><main><h1>Image Transformations</h1>");

    if let Some(message) = &page.message {
        let class = if message == UPLOAD_PROMPT { "prompt" } else { "error" };
        out.push_str(&format!(r#"<p class="{class}">{}</p>"#, escape_html(message)));
    }

    if let Some(original) = &page.original_png {
        out.push_str(r#"<div class="results">"#);
        render_figure(&mut out, original, "Original Image");
        if let Some(transformed) = &page.transformed_png {
            render_figure(
                &mut out,
                transformed,
                &format!("{} Image", page.kind.label()),
            );
        }
        out.push_str("</div>");
    }

    out.push_str("</main></body></html>");
    out
}

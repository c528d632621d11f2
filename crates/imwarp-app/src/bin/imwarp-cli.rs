use std::time::Instant;

use imwarp::io::functional as F;
use imwarp_app::{config::CliArgs, Transformation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: CliArgs = argh::from_env();

    // read the image
    let image = F::read_image_rgb8(&args.input)?;
    log::info!("Read {} image from {}", image.size(), args.input.display());

    // collect the parameters, falling back to the defaults for this image
    let kind = args.transformation;
    let values = kind
        .params(Some(image.size()))
        .iter()
        .map(|p| args.value(p.name).unwrap_or(p.default))
        .collect::<Vec<_>>();
    let transformation = Transformation::from_values(kind, &values)?.clamped(image.size());
    log::debug!("parameters: {transformation:?}");

    let start = Instant::now();
    let transformed = transformation.apply(&image, args.interpolation)?;
    log::info!(
        "Applied {} in {:?}",
        transformation.describe(),
        start.elapsed()
    );

    F::write_image_rgb8(&args.output, &transformed, args.quality)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

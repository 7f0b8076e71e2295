// Runs a network on a synthetic 4×4 grayscale image and prints the model and
// its class scores. Pass a network spec JSON path to replace the built-in
// demo architecture; set RUST_LOG=debug for per-layer traces.
use std::error::Error;

use ferrite_cnn::logging::init_logging;
use ferrite_cnn::{classify, ActivationKind, LayerSpec, Network, NetworkSpec, OutputCanvas};
use image::{DynamicImage, GrayImage};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("ferrite-cnn: {e}");
        std::process::exit(1);
    }
}

fn demo_spec() -> NetworkSpec {
    NetworkSpec {
        name: "demo".into(),
        seed: None,
        layers: vec![
            LayerSpec::Convolution {
                filter_count: 3,
                kernel_width: 2,
                kernel_height: 2,
                stride_x: 1,
                stride_y: 1,
                input_channels: 1,
                canvas: OutputCanvas::Downsampled,
            },
            LayerSpec::Activation { kind: ActivationKind::Relu },
            LayerSpec::Pooling { window_width: 2, window_height: 2, stride_x: 1, stride_y: 1 },
            LayerSpec::FullyConnected { node_count: 3 },
        ],
        class_labels: Some(vec!["washer".into(), "tape".into(), "bolt".into()]),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let spec = match std::env::args().nth(1) {
        Some(path) => NetworkSpec::load_json(&path)?,
        None => demo_spec(),
    };
    log::info!("building network '{}' with {} layers", spec.name, spec.layers.len());

    let pixels: Vec<u8> = (1..=16).collect();
    let image = GrayImage::from_raw(4, 4, pixels)
        .map(DynamicImage::ImageLuma8)
        .ok_or("demo image buffer has the wrong size")?;

    let mut network = Network::from_spec(&spec)?;
    let scores = network.forward_pass(&image)?;
    network.print_network();

    println!("Scores:");
    for (i, score) in scores.iter().enumerate() {
        println!("Class {}: {score}", spec.label_for(i));
    }
    match classify(&scores) {
        Some(class) => println!("Classified as {}", spec.label_for(class)),
        None => println!("No class scored above zero"),
    }
    Ok(())
}

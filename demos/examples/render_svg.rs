// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render a decision tree to SVG, collapse a branch, and drive the view.
//!
//! The tree is read from the JSON file given as the first argument, or a
//! built-in five-node tree when there is none. An optional second argument
//! is a JSON `RenderConfig` overriding any of the defaults. The SVG is
//! written to stdout; progress goes to stderr.
//!
//! Run:
//! - `cargo run -p arbor_demos --example render_svg > tree.svg`
//! - `RUST_LOG=arbor_renderer=debug,arbor_scene=trace cargo run -p arbor_demos --example render_svg -- tree.json`

use std::error::Error;
use std::{env, fs};

use arbor_layout::LayoutId;
use arbor_renderer::{PickTarget, RenderConfig, TreeRenderer};
use arbor_scene::SvgDocument;
use arbor_view::{ClickResult, WheelDelta};
use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"{
    "root": {
        "label": "f1>2", "data": 1.0,
        "children": [
            { "value": 51, "data": 0.1 },
            { "label": "f1>2", "data": 0.9, "children": [
                { "value": 1, "data": 0.8 },
                { "value": 2, "data": 0.1 }
            ] }
        ]
    }
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let payload = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_owned(),
    };
    let config: RenderConfig = match args.next() {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => RenderConfig::default(),
    };

    let mut renderer = TreeRenderer::with_config(SvgDocument::new(), config);
    let stats = renderer.render_json(&payload)?;
    eprintln!(
        "rendered {} nodes and {} links",
        stats.nodes.created, stats.links.created
    );

    // Click the root's expander twice: collapse, then expand again.
    for (down, up) in [(0, 40), (1_000, 1_040)] {
        let Some(at) = expander_point(&renderer, LayoutId::ROOT) else {
            break;
        };
        renderer.pointer_down(at, down);
        if let ClickResult::Click(PickTarget::Expander(id)) = renderer.pointer_up(at, up)? {
            let visible = renderer.layout().map_or(0, |t| t.visible().count());
            eprintln!("toggled node {id}: {visible} visible");
        }
    }

    // Zoom out a little around the canvas centre, pan, then reset.
    renderer.wheel(Point::new(400.0, 400.0), WheelDelta::Pixels(100.0))?;
    renderer.pan_by(Vec2::new(-40.0, 0.0))?;
    eprintln!("view: {:?}", renderer.view_transform());
    renderer.reset_view(2_000)?;
    let mut now = 2_000;
    while renderer.is_animating() {
        now += 16;
        renderer.tick(now)?;
    }
    eprintln!("view after reset: {:?}", renderer.view_transform());

    println!("{}", renderer.surface().to_svg_string());
    Ok(())
}

/// Surface position of a branch node's expander.
fn expander_point(renderer: &TreeRenderer, id: LayoutId) -> Option<Point> {
    let (_, circle) = renderer.glyph(id)?.expander?;
    Some(renderer.surface().world_transform(circle)? * Point::ZERO)
}

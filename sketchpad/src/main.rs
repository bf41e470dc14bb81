use anyhow::Result as AnyResult;

use sketchpad::config::SessionConfig;
use sketchpad::session::Session;
use sketchpad::viewport::PanTrigger;
use sketchpad_core::input::{PointerInput, SurfaceRect};
use sketchpad_core::stroke::Point;

/// Drive one scripted drag through the pointer lifecycle.
fn drag(session: &mut Session, path: &[(f32, f32)]) {
    let rect = SurfaceRect {
        left: 0.0,
        top: 0.0,
        width: session.extent() as f32,
        height: session.extent() as f32,
    };
    let mouse = |&(x, y): &(f32, f32)| PointerInput::Mouse {
        client_x: x,
        client_y: y,
    };
    let (first, rest) = path.split_first().expect("scripted path is non-empty");
    session.pointer_down(&mouse(first), rect);
    for point in rest {
        session.pointer_move(&mouse(point), rect);
    }
    session.pointer_up();
}

/// Sample a gentle arc between two points.
fn arc(from: Point, to: Point, lift: f32, steps: usize) -> Vec<(f32, f32)> {
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t - lift * (t * std::f32::consts::PI).sin();
            (x, y)
        })
        .collect()
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    // Single optional argument: where to write the exported PNG.
    let out_path = std::env::args_os()
        .nth(1)
        .unwrap_or_else(|| "sketch.png".into());

    let config = match SessionConfig::default_path() {
        Some(path) => SessionConfig::load(&path)?,
        None => SessionConfig::default(),
    };
    log::info!(
        "session: {}px workspace, tool {:?}",
        config.workspace_extent,
        config.tool
    );
    let mut session = Session::new(&config);

    // A scripted scene touching every tool, then a layered pass with an
    // eraser correction, so the exported image exercises the whole engine.
    session.set_width(14.0);
    session.set_stroke_color("#2b6cb0");
    session.set_tool("brush");
    drag(
        &mut session,
        &arc(Point::new(180.0, 420.0), Point::new(860.0, 380.0), 120.0, 32),
    );

    session.set_tool("pencil");
    session.set_stroke_color("#4a4a4a");
    session.set_width(8.0);
    drag(
        &mut session,
        &arc(Point::new(200.0, 620.0), Point::new(900.0, 640.0), -80.0, 40),
    );

    session.set_tool("marker");
    session.set_stroke_color("#c53030");
    session.set_width(18.0);
    drag(
        &mut session,
        &arc(Point::new(240.0, 820.0), Point::new(820.0, 800.0), 60.0, 24),
    );

    // Ink on its own layer, highlighted; the multiply band darkens the ink
    // underneath it.
    let ink_layer = session.add_layer();
    session.set_tool("ink");
    session.set_stroke_color("#1a202c");
    session.set_width(10.0);
    drag(
        &mut session,
        &arc(Point::new(260.0, 980.0), Point::new(880.0, 960.0), 30.0, 28),
    );
    session.set_tool("highlighter");
    session.set_stroke_color("#ecc94b");
    session.set_width(16.0);
    drag(
        &mut session,
        &[(250.0, 975.0), (890.0, 965.0)],
    );

    // Scrub out part of the marker pass, then take back the last stroke.
    let base = session
        .layers()
        .next()
        .map(|layer| layer.id)
        .expect("stack keeps at least one layer");
    session.select_layer(base);
    session.set_eraser(true);
    session.set_width(24.0);
    drag(&mut session, &[(500.0, 790.0), (560.0, 830.0)]);
    session.set_eraser(false);

    session.set_tool("pencil");
    drag(&mut session, &[(100.0, 100.0), (300.0, 300.0)]);
    session.undo();
    session.select_layer(ink_layer);

    // Frame the viewport on the drawn region; none of this touches layer
    // content or the export.
    session.resize_display(1024, 768);
    session.set_zoom(1.5);
    session.pan_press(PanTrigger::MIDDLE_BUTTON, (0.0, 0.0));
    session.pan_move((-90.0, -120.0));
    session.pan_release(PanTrigger::MIDDLE_BUTTON);

    let mut file = std::io::BufWriter::new(std::fs::File::create(&out_path)?);
    session.export_png(&mut file)?;
    log::info!("exported {}", std::path::Path::new(&out_path).display());
    Ok(())
}

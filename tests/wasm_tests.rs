//! WASM tests using wasm_bindgen_test
//!
//! Run with: wasm-pack test --headless --chrome --features wasm

#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

// Configure tests to run in browser environment
wasm_bindgen_test_configure!(run_in_browser);

use particle_field::wasm::ParticleCanvas;

/// Add a fresh canvas with the given id to the document.
fn add_canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement =
        document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn test_attach_sizes_canvas_to_window() {
    let canvas = add_canvas("field-size");
    let mut backdrop = ParticleCanvas::attach("field-size").unwrap();

    let window = web_sys::window().unwrap();
    let width = window.inner_width().unwrap().as_f64().unwrap() as u32;
    let height = window.inner_height().unwrap().as_f64().unwrap() as u32;
    assert_eq!(canvas.width(), width);
    assert_eq!(canvas.height(), height);
    assert!(backdrop.is_running());

    backdrop.stop();
}

#[wasm_bindgen_test]
fn test_stop_is_idempotent() {
    add_canvas("field-stop");
    let mut backdrop = ParticleCanvas::attach("field-stop").unwrap();
    backdrop.stop();
    assert!(!backdrop.is_running());
    backdrop.stop();
    assert!(!backdrop.is_running());
}

#[wasm_bindgen_test]
fn test_missing_canvas_is_an_error() {
    assert!(ParticleCanvas::attach("no-such-canvas").is_err());
}

#[wasm_bindgen_test]
fn test_non_canvas_element_is_an_error() {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    div.set_id("field-div");
    document.body().unwrap().append_child(&div).unwrap();

    assert!(ParticleCanvas::attach("field-div").is_err());
}

#[wasm_bindgen_test]
fn test_attach_with_config() {
    add_canvas("field-config");
    let toml = "[particles]\ncount = 20\n\n[resize]\ndebounce_ms = 50\n";
    let mut backdrop = ParticleCanvas::attach_with_config("field-config", toml).unwrap();
    assert!(backdrop.is_running());
    backdrop.stop();

    add_canvas("field-bad-config");
    assert!(ParticleCanvas::attach_with_config("field-bad-config", "[edges]\nthreshold = 0\n").is_err());
}

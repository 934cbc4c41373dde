#![cfg(target_arch = "wasm32")]

use domain_viz_wasm::DomainViz;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let elem: web_sys::HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    elem.style().set_property("width", "320px").unwrap();
    elem.style().set_property("height", "200px").unwrap();
    document.body().unwrap().append_child(&elem).unwrap();
    elem
}

#[wasm_bindgen_test]
fn mounts_canvas_and_cleans_up() {
    let elem = container();
    let mut viz = DomainViz::new(Some(elem.clone()), 3, String::new(), None);

    let canvas = elem.query_selector("canvas").unwrap();
    // Headless browsers without WebGL2 leave the container untouched.
    assert_eq!(canvas.is_some(), viz.is_rendering());

    viz.set_domain_index(12);
    viz.set_background_media_url("poster.jpg".into());
    viz.destroy();
    viz.destroy();

    assert!(!viz.is_rendering());
    assert!(elem.query_selector("canvas").unwrap().is_none());
    assert_eq!(elem.child_element_count(), 0);
    elem.remove();
}

#[wasm_bindgen_test]
fn missing_container_is_a_no_op() {
    let mut viz = DomainViz::new(None, 0, String::new(), None);
    assert!(!viz.is_rendering());
    viz.set_domain_index(5);
    viz.destroy();
}

#[wasm_bindgen_test]
fn bad_options_fall_back_to_defaults() {
    let elem = container();
    let mut viz = DomainViz::new(Some(elem.clone()), -4, String::new(), Some("{oops".into()));
    assert_eq!(elem.query_selector("canvas").unwrap().is_some(), viz.is_rendering());
    viz.destroy();
    elem.remove();
}

#[wasm_bindgen_test]
fn dropping_the_handle_tears_down() {
    let elem = container();
    let viz = DomainViz::new(Some(elem.clone()), 1, "poster.jpg".into(), None);
    assert_eq!(elem.query_selector("canvas").unwrap().is_some(), viz.is_rendering());

    drop(viz);

    assert!(elem.query_selector("canvas").unwrap().is_none());
    assert_eq!(elem.child_element_count(), 0);
    elem.remove();
}

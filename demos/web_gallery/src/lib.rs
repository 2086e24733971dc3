// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A long gallery whose images and video only load as they scroll into view.
//!
//! Every figure is a wrapper holding one deferred source. Figures alternate
//! between a plain `<img>`, a `<picture>` with a responsive `<source>`, and
//! (last) a `<video>`. Trace events go to the browser console.
//!
//! Build with: `wasm-pack build --target web demos/web_gallery`
//! Then serve `demos/web_gallery/` and open `index.html`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;

use lazysrc_backend_web::{ConsoleSink, LoaderOptions, WebLoader};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

const FIGURES: u32 = 24;
const PLACEHOLDER: &str = "data-src";
const VIDEO_URL: &str = "https://github.com/vidanov/video/raw/master/test_files/1080p50.mp4";

/// Entry point for the gallery demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .expect("window")
        .document()
        .expect("document");
    let body = document.body().expect("body");

    let loader = WebLoader::new(LoaderOptions::new(PLACEHOLDER).threshold(0.25))
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    loader.set_trace_sink(Box::new(ConsoleSink::new("[gallery]")));

    for i in 0..FIGURES {
        let figure = element(&document, "figure")?;
        if i % 2 == 0 {
            let img = document.create_element("img")?;
            img.set_attribute(PLACEHOLDER, &format!("https://picsum.photos/seed/{i}/640/400"))?;
            img.set_attribute("alt", &format!("Photo {i}"))?;
            figure.append_child(&img)?;
        } else {
            let picture = document.create_element("picture")?;
            let source = document.create_element("source")?;
            source.set_attribute("srcset", "")?;
            source.set_attribute(
                PLACEHOLDER,
                &format!(
                    "https://picsum.photos/seed/{i}/640/400 1x, https://picsum.photos/seed/{i}/1280/800 2x"
                ),
            )?;
            let img = document.create_element("img")?;
            img.set_attribute(PLACEHOLDER, &format!("https://picsum.photos/seed/{i}/640/400"))?;
            picture.append_child(&source)?;
            picture.append_child(&img)?;
            figure.append_child(&picture)?;
        }
        body.append_child(&figure)?;
        loader.add(&figure);
    }

    let figure = element(&document, "figure")?;
    let video = document.create_element("video")?;
    video.set_attribute(PLACEHOLDER, VIDEO_URL)?;
    video.set_attribute("muted", "")?;
    video.set_attribute("controls", "")?;
    figure.append_child(&video)?;
    body.append_child(&figure)?;
    loader.add(&figure);

    if let Some(status) = document.get_element_by_id("status") {
        status.set_text_content(Some(&format!(
            "mode: {:?}, watching {}",
            loader.mode(),
            loader.watched_len()
        )));
    }

    // The page lives as long as the loader; keep it alive.
    core::mem::forget(loader);
    Ok(())
}

fn element(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(doc.create_element(tag)?.unchecked_into())
}

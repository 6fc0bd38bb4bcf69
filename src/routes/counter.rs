//! Counter page — mounts a remote component and streams its slot.
//!
//! The page shell goes out with the slot as it stands when the mount starts,
//! normally the placeholder. Once the mount settles the final slot follows
//! in the same response, together with a snippet that drops the placeholder.
//! Failure detail goes to the log only; the page never shows it.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::response::Html;
use futures::{StreamExt, future, stream};

use crate::services::mount::{ComponentMount, LoadState};
use crate::state::ConsumerState;

pub const PLACEHOLDER: &str = "Loading counter...";
pub const FALLBACK: &str = "Counter is unavailable right now.";

const PAGE_HEAD: &str = r#"<!doctype html>
<html>
  <head><title>Counter from App-1</title></head>
  <body>
    <h1>Counter from App-1</h1>
"#;

const PAGE_TAIL: &str = r#"
    <p>This counter component is loaded from app-1 via module federation.</p>
  </body>
</html>
"#;

const DROP_PLACEHOLDER: &str =
    r#"<script>document.querySelector('.component-slot[data-state="pending"]')?.remove()</script>"#;

/// `GET /counter`
pub async fn counter_page(State(state): State<ConsumerState>) -> Html<Body> {
    let mount = ComponentMount::spawn(state.resolver.clone(), state.module.clone());
    tracing::debug!(mount = %mount.id(), module = mount.module_id(), "rendering counter page");

    let initial = mount.state();
    let head = format!("{PAGE_HEAD}    {}\n", render_slot(&initial));
    let rest = async move {
        if initial.is_pending() {
            let settled = LoadState::from(mount.settled().await);
            format!("    {}\n    {DROP_PLACEHOLDER}{PAGE_TAIL}", render_slot(&settled))
        } else {
            PAGE_TAIL.to_owned()
        }
    };

    let chunks = stream::once(future::ready(head)).chain(stream::once(rest)).map(Ok::<_, Infallible>);
    Html(Body::from_stream(chunks))
}

/// Markup for one component slot in the given load state.
#[must_use]
pub fn render_slot(state: &LoadState) -> String {
    match state {
        LoadState::Pending => format!(r#"<div class="component-slot" data-state="pending">{PLACEHOLDER}</div>"#),
        LoadState::Resolved(component) => format!(
            r#"<div class="component-slot" data-state="resolved" data-module="{}">{}</div>"#,
            component.module, component.body
        ),
        LoadState::Failed(_) => format!(r#"<div class="component-slot" data-state="failed">{FALLBACK}</div>"#),
    }
}

#[cfg(test)]
#[path = "counter_test.rs"]
mod tests;

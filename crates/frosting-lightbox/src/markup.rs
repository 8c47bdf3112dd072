//! Markup injected when the page does not provide its own lightbox

/// Overlay, backdrop, dialog, close button and image, hidden until opened.
///
/// Class names are namespaced with `ff-` so they do not collide with the
/// page's own styles.
pub const LIGHTBOX_MARKUP: &str = r#"<div class="ff-lightbox" hidden>
  <div class="ff-backdrop"></div>
  <div class="ff-modal" role="dialog" aria-modal="true" aria-label="Image preview">
    <button class="ff-close" aria-label="Close preview">×</button>
    <img id="ff-lightbox-img" alt="Expanded dessert image">
  </div>
</div>"#;

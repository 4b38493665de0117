//! HTML rendering
//!
//! Renders the index page and the playback fragment. Every interpolated value
//! goes through `html_escape`.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// What the playback fragment needs to show a video
#[derive(Debug, Clone, Copy)]
pub struct VideoView<'a> {
    pub reference: &'a str,
    pub display_name: &'a str,
}

/// Public URL a stored object is served from
pub fn playback_url(reference: &str) -> String {
    let file_name = reference.rsplit('/').next().unwrap_or(reference);
    format!("/uploads/{}", urlencoding::encode(file_name))
}

/// Full index page, with the player filled in when a video is known
pub fn render_index(video: Option<VideoView<'_>>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Reel</title>
  <script type="module" src="/scripts/components/upload-area.js"></script>
</head>
<body>
  <main>
    <h1>Reel</h1>
    <form action="/" method="post" enctype="multipart/form-data">
      <upload-area accepts="video/*">
        <p>Drop a video here, or click to choose one.</p>
      </upload-area>
      <noscript>
        <input type="file" name="video" accept="video/*">
        <button type="submit">Upload</button>
      </noscript>
    </form>
    <section id="player">
{fragment}
    </section>
  </main>
  <script>
    const player = document.getElementById("player");
    const refresh = async () => {{
      const response = await fetch("/video");
      if (response.ok) player.innerHTML = await response.text();
    }};
    document.querySelector("upload-area").addEventListener("fileuploaded", refresh);
    if (!player.querySelector("video")) refresh();
  </script>
</body>
</html>
"#,
        fragment = render_video(video)
    )
}

/// Playback fragment served by `/video`
pub fn render_video(video: Option<VideoView<'_>>) -> String {
    match video {
        Some(video) => format!(
            r#"<figure class="video" data-reference="{reference}">
  <video controls preload="metadata" src="{src}"></video>
  <figcaption>{name}</figcaption>
</figure>"#,
            reference = encode_double_quoted_attribute(video.reference),
            src = encode_double_quoted_attribute(&playback_url(video.reference)),
            name = encode_text(video.display_name),
        ),
        None => r#"<p class="video-empty">No video uploaded yet.</p>"#.to_string(),
    }
}

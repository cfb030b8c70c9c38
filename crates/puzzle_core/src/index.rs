pub const INDEX_FILENAME: &str = "index.html";

/// Local name of the image stored at `index` in the list.
pub fn image_filename(index: usize) -> String {
    format!("img{index}")
}

pub fn image_tag(name: &str) -> String {
    format!("<img src='{name}'>")
}

/// Minimal HTML page showing every image, in the order given.
pub fn render_index<S: AsRef<str>>(names: &[S]) -> String {
    let tags: String = names.iter().map(|name| image_tag(name.as_ref())).collect();
    format!("<html>\n<body>\n{tags}\n</body>\n</html>\n")
}

//
//  bitbucket-cloud-cli
//  output/markdown.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal rendering of markdown wiki pages.

/// Renders markdown to a string styled for the terminal.
pub fn render_markdown(text: &str) -> String {
    termimad::text(text).to_string()
}

/// Prints rendered markdown to stdout.
pub fn print_markdown(text: &str) {
    println!("{}", render_markdown(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_text() {
        let rendered = render_markdown("# Title\n\nSome body text.");
        assert!(rendered.contains("Title"));
        assert!(rendered.contains("Some body text."));
    }
}

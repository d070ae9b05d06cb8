//! Prompt template sent to the language model

/// Build the CSS-generation prompt for one request.
///
/// The art direction and the reduced HTML are embedded verbatim; the model is
/// told to answer with raw CSS only.
#[must_use]
pub fn build_style_prompt(art_direction: &str, reduced_html: &str) -> String {
    format!(
        "You are a creative web designer. Your task is to generate CSS code that overrides\n\
the styles of a webpage to satisfy a specific art direction, based *only* on the provided HTML structure.\n\
\n\
Context:\n\
1.  **Art Direction:** {art_direction}\n\
2.  **Current HTML Structure (simplified):**\n\
\x20   ```html\n\
\x20   {reduced_html}\n\
\x20   ```\n\
\n\
Instructions:\n\
- Be highly creative and bold in your CSS design choices while at the same time make it a PRIORITY to IMPROVE the UI if possible.\n\
- Over use small animations and transitions to make the page feel alive.\n\
- In addition to changing colors (background, text, links, accents), also creatively modify:\n\
\x20   • Border styles (width, color, style: solid, dashed, double, etc.)\n\
\x20   • Border radius (rounded corners, pill shapes, etc.)\n\
\x20   • Box shadows and text shadows for glowing effects\n\
\x20   • Add !important to everything to ensure it overrides existing styles.\n\
\x20   • Background images, colors, gradients, transparency, or patterns\n\
\x20   • Text shadows, text decorations (underline, line-through)\n\
\x20   • Font families, font weights, and font styles\n\
\x20   • Spacing (padding, margin, letter-spacing, line-height)\n\
\x20   • Button and input styles (hover, active, focus states)\n\
\x20   • Any other visually impactful CSS properties\n\
\x20   • Hover states, active states, and focus states should be included for interactive elements.\n\
- Use a variety of CSS features to make the theme visually distinct and interesting.\n\
- Ensure the CSS selectors are specific enough to target the intended elements based on the HTML structure.\n\
- Ensure that foreground text and background colors have opposing contrast for readability.\n\
- Do not include explanations or markdown formatting like ```css. Only return the raw CSS code.\n\
- Reject any and all javascript \n"
    )
}

//! The [`Paragraph`] model shared by the cache and the playback controller.

/// One ordered, non-blank text segment of the source document.
///
/// Indices are 1-based and dense: the `n`-th non-blank block returned by the
/// content source becomes paragraph `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub index: usize,
    pub text: String,
}

impl Paragraph {
    /// Number `blocks` in order, trimming each and dropping blank ones.
    ///
    /// ```
    /// use article_narrator::content::Paragraph;
    ///
    /// let paragraphs = Paragraph::number(["  First ", "", "   ", "Second"]);
    /// assert_eq!(paragraphs.len(), 2);
    /// assert_eq!(paragraphs[0].index, 1);
    /// assert_eq!(paragraphs[0].text, "First");
    /// assert_eq!(paragraphs[1].index, 2);
    /// assert_eq!(paragraphs[1].text, "Second");
    /// ```
    pub fn number<I, S>(blocks: I) -> Vec<Paragraph>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        blocks
            .into_iter()
            .filter_map(|block| {
                let text = block.as_ref().trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .enumerate()
            .map(|(i, text)| Paragraph { index: i + 1, text })
            .collect()
    }

    /// `true` when the text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

//! The template scanner.
//!
//! A single left-to-right pass over the source characters. The active mode is
//! the top of a stack of [`Region`]s; with the stack empty the scanner is in
//! plain text and accumulates a pending run. Hitting any region opener
//! flushes the pending run (trimmed, and only if it contains a word-like
//! character) as a [`Finding`] anchored at the run's first character.
//!
//! The scanner is total: malformed or unterminated markup never errors. An
//! unterminated region simply absorbs the rest of the input, and a closer
//! with no matching opener is ignored.

use super::cursor::Cursor;
use super::finding::Finding;
use super::region::{AttrEnd, BlockKind, Region, TagState, TemplateTagState, TranslateMarkers};
use crate::utils::contains_alphabetic;

/// Scan `source` with the default translate markers and collect every
/// finding.
///
/// ```
/// use translint::core::scan;
///
/// let findings = scan("<h1>Foo</h1>");
/// assert_eq!(findings.len(), 1);
/// assert_eq!((findings[0].line, findings[0].col), (1, 5));
/// assert_eq!(findings[0].text, "Foo");
/// ```
pub fn scan(source: &str) -> Vec<Finding> {
    Scanner::new(source).collect()
}

/// Streaming scanner over one decoded template buffer.
///
/// Implements [`Iterator`]; findings are produced lazily, in source order,
/// and the sequence is bounded by the input length. Each scanner owns its
/// cursor and region stack, so independent scans can run concurrently.
pub struct Scanner {
    chars: Vec<char>,
    cursor: Cursor,
    stack: Vec<Region>,
    pending: Pending,
    /// Finding held back while a comment is scanned; a `notrans` comment
    /// body cancels it, anything else releases it at the comment close.
    deferred: Option<Finding>,
    markers: TranslateMarkers,
    done: bool,
}

#[derive(Default)]
struct Pending {
    text: String,
    line: usize,
    col: usize,
}

/// Dispatch discriminant derived from the top of the region stack.
#[derive(Clone, Copy)]
enum Mode {
    Text { collect: bool },
    Tag,
    AttrValue(AttrEnd),
    Script,
    Comment,
    TemplateTag,
    Delimited(&'static str),
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self::with_markers(source, TranslateMarkers::default())
    }

    pub fn with_markers(source: &str, markers: TranslateMarkers) -> Self {
        Self {
            chars: source.chars().collect(),
            cursor: Cursor::new(),
            stack: Vec::new(),
            pending: Pending::default(),
            deferred: None,
            markers,
            done: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.cursor.advance(ch);
        Some(ch)
    }

    fn bump_n(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    /// The next characters are exactly `pat` (ASCII, exact case).
    fn lookahead(&self, pat: &str) -> bool {
        pat.chars()
            .enumerate()
            .all(|(i, ch)| self.peek_at(i) == Some(ch))
    }

    /// Case-insensitive variant; `pat` must be lowercase ASCII.
    fn lookahead_ci(&self, pat: &str) -> bool {
        pat.chars()
            .enumerate()
            .all(|(i, ch)| self.peek_at(i).map(|c| c.to_ascii_lowercase()) == Some(ch))
    }

    fn mode(&self) -> Mode {
        match self.stack.last() {
            None => Mode::Text { collect: true },
            Some(Region::TranslationBlock { .. } | Region::TranslatedElement) => {
                Mode::Text { collect: false }
            }
            Some(Region::RawTag(_)) => Mode::Tag,
            Some(Region::AttrValue(end)) => Mode::AttrValue(*end),
            Some(Region::ScriptBody) => Mode::Script,
            Some(Region::Comment { .. }) => Mode::Comment,
            Some(Region::TemplateTag(_)) => Mode::TemplateTag,
            Some(Region::TemplateVar) => Mode::Delimited("}}"),
            Some(Region::Interpolation { close }) => Mode::Delimited(*close),
        }
    }

    /// Finalize the pending run: trim trailing whitespace and drop runs with
    /// no word-like character. Leading whitespace never enters the buffer,
    /// so the stored position is the anchor of the first real character.
    fn flush(&mut self) -> Option<Finding> {
        let text = std::mem::take(&mut self.pending.text);
        let trimmed = text.trim_end();
        if trimmed.is_empty() || !contains_alphabetic(trimmed) {
            return None;
        }
        Some(Finding::new(self.pending.line, self.pending.col, trimmed))
    }

    // --- plain text and suppressed content -------------------------------

    fn step_text(&mut self, collect: bool) -> Option<Finding> {
        if self.lookahead("<!--") {
            self.deferred = self.flush();
            self.bump_n(4);
            self.stack.push(Region::Comment {
                close: "-->",
                body: String::new(),
            });
            return None;
        }
        if self.lookahead("{#") {
            self.deferred = self.flush();
            self.bump_n(2);
            self.stack.push(Region::Comment {
                close: "#}",
                body: String::new(),
            });
            return None;
        }
        if self.lookahead("{[{") {
            let emitted = self.flush();
            self.bump_n(3);
            self.stack.push(Region::Interpolation { close: "}]}" });
            return emitted;
        }
        if self.lookahead("[[") {
            let emitted = self.flush();
            self.bump_n(2);
            self.stack.push(Region::Interpolation { close: "]]" });
            return emitted;
        }
        if self.lookahead("{{") {
            let emitted = self.flush();
            self.bump_n(2);
            self.stack.push(Region::TemplateVar);
            return emitted;
        }
        if self.lookahead("{%") {
            let emitted = self.flush();
            self.bump_n(2);
            self.stack.push(Region::TemplateTag(TemplateTagState::default()));
            return emitted;
        }
        if self.peek() == Some('<') {
            let emitted = self.flush();
            self.bump();
            let closing = self.peek() == Some('/');
            if closing {
                self.bump();
            }
            self.stack.push(Region::RawTag(TagState::new(closing)));
            return emitted;
        }

        let (line, col) = (self.cursor.line, self.cursor.col);
        let Some(ch) = self.bump() else { return None };
        if collect {
            if self.pending.text.is_empty() {
                if !ch.is_whitespace() {
                    self.pending.line = line;
                    self.pending.col = col;
                    self.pending.text.push(ch);
                }
            } else {
                self.pending.text.push(ch);
            }
        }
        None
    }

    // --- tag interior ----------------------------------------------------

    fn step_tag(&mut self) -> Option<Finding> {
        // Embedded template syntax inside a tag stays opaque and must not
        // confuse quote or `>` matching.
        if self.lookahead("{%") {
            self.bump_n(2);
            self.stack.push(Region::TemplateTag(TemplateTagState::default()));
            return None;
        }
        if self.lookahead("{[{") {
            self.bump_n(3);
            self.stack.push(Region::Interpolation { close: "}]}" });
            return None;
        }
        if self.lookahead("{{") {
            self.bump_n(2);
            self.stack.push(Region::TemplateVar);
            return None;
        }

        let Some(ch) = self.peek() else { return None };
        match ch {
            '>' => {
                self.bump();
                self.finish_attr();
                self.close_tag();
            }
            '=' => {
                self.bump();
                self.finish_attr();
                self.start_attr_value();
            }
            '/' => {
                self.bump();
                self.finish_attr();
                if let Some(Region::RawTag(tag)) = self.stack.last_mut() {
                    tag.slash = true;
                    tag.name_done = true;
                }
            }
            c if c.is_whitespace() => {
                self.bump();
                self.finish_attr();
                if let Some(Region::RawTag(tag)) = self.stack.last_mut() {
                    tag.name_done = true;
                }
            }
            c => {
                self.bump();
                if let Some(Region::RawTag(tag)) = self.stack.last_mut() {
                    tag.slash = false;
                    if tag.name_done {
                        tag.attr.push(c.to_ascii_lowercase());
                    } else {
                        tag.name.push(c.to_ascii_lowercase());
                    }
                }
            }
        }
        None
    }

    /// Close out the attribute name being accumulated, checking it against
    /// the translate-marker table.
    fn finish_attr(&mut self) {
        let Some(Region::RawTag(tag)) = self.stack.last_mut() else {
            return;
        };
        if tag.attr.is_empty() {
            return;
        }
        if self.markers.matches(&tag.attr) {
            tag.translate = true;
        }
        tag.attr.clear();
    }

    fn start_attr_value(&mut self) {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                self.stack.push(Region::AttrValue(AttrEnd::Quote(quote)));
            }
            Some(c) if !c.is_whitespace() && c != '>' => {
                self.stack.push(Region::AttrValue(AttrEnd::Unquoted));
            }
            _ => {}
        }
    }

    /// Handle the `>` that ends a tag: pop the tag and apply its effect on
    /// the surrounding regions.
    fn close_tag(&mut self) {
        let Some(Region::RawTag(tag)) = self.stack.pop() else {
            return;
        };
        if tag.closing {
            match self.stack.last() {
                Some(Region::ScriptBody) if tag.name == "script" => {
                    self.stack.pop();
                }
                // A translate-marked element's scope ends at the first
                // closing tag, whichever element it closes.
                Some(Region::TranslatedElement) => {
                    self.stack.pop();
                }
                _ => {}
            }
        } else if !tag.slash {
            if tag.name == "script" {
                self.stack.push(Region::ScriptBody);
            } else if tag.translate {
                self.stack.push(Region::TranslatedElement);
            }
        }
    }

    // --- attribute values ------------------------------------------------

    fn step_attr_value(&mut self, end: AttrEnd) -> Option<Finding> {
        if self.lookahead("{%") {
            self.bump_n(2);
            self.stack.push(Region::TemplateTag(TemplateTagState::default()));
            return None;
        }
        if self.lookahead("{[{") {
            self.bump_n(3);
            self.stack.push(Region::Interpolation { close: "}]}" });
            return None;
        }
        if self.lookahead("[[") {
            self.bump_n(2);
            self.stack.push(Region::Interpolation { close: "]]" });
            return None;
        }
        if self.lookahead("{{") {
            self.bump_n(2);
            self.stack.push(Region::TemplateVar);
            return None;
        }

        let Some(ch) = self.peek() else { return None };
        match end {
            AttrEnd::Quote(quote) => {
                self.bump();
                if ch == quote {
                    self.stack.pop();
                }
            }
            AttrEnd::Unquoted => {
                if ch == '>' {
                    // Leave the `>` for the tag to consume.
                    self.stack.pop();
                } else {
                    self.bump();
                    if ch.is_whitespace() {
                        self.stack.pop();
                    }
                }
            }
        }
        None
    }

    // --- script bodies ---------------------------------------------------

    fn step_script(&mut self) -> Option<Finding> {
        if self.lookahead_ci("</script") {
            let boundary = self.peek_at(8);
            if boundary.is_none()
                || matches!(boundary, Some(c) if c.is_whitespace() || c == '>' || c == '/')
            {
                self.bump_n(8);
                self.stack
                    .push(Region::RawTag(TagState::closing_named("script")));
                return None;
            }
        }
        self.bump();
        None
    }

    // --- comments --------------------------------------------------------

    fn step_comment(&mut self) -> Option<Finding> {
        let close = match self.stack.last() {
            Some(Region::Comment { close, .. }) => *close,
            _ => return None,
        };
        if self.lookahead(close) {
            self.bump_n(close.len());
            let Some(Region::Comment { body, .. }) = self.stack.pop() else {
                return None;
            };
            if body.contains("notrans") {
                self.deferred = None;
                return None;
            }
            return self.deferred.take();
        }
        if let Some(ch) = self.bump()
            && let Some(Region::Comment { body, .. }) = self.stack.last_mut()
        {
            body.push(ch);
        }
        None
    }

    // --- template tags ---------------------------------------------------

    fn step_template_tag(&mut self) -> Option<Finding> {
        if self.lookahead("%}") {
            self.bump_n(2);
            let Some(Region::TemplateTag(state)) = self.stack.pop() else {
                return None;
            };
            self.apply_tag_keyword(&state);
            return None;
        }
        let Some(ch) = self.bump() else { return None };
        if let Some(Region::TemplateTag(state)) = self.stack.last_mut() {
            if !state.word_done {
                if ch.is_alphanumeric() || ch == '_' {
                    state.word.push(ch.to_ascii_lowercase());
                } else if state.word.is_empty() && (ch.is_whitespace() || ch == '-') {
                    // leading whitespace or a whitespace-control marker
                } else {
                    state.word_done = true;
                    if !ch.is_whitespace() {
                        state.has_args = true;
                    }
                }
            } else if !ch.is_whitespace() {
                state.has_args = true;
            }
        }
        None
    }

    /// Open, nest, or close a translation block once a `{% … %}` tag has
    /// been fully consumed. Only takes effect in text-like context: a
    /// `blocktrans` buried inside an attribute value cannot capture the
    /// surrounding markup.
    fn apply_tag_keyword(&mut self, state: &TemplateTagState) {
        let text_context = matches!(
            self.stack.last(),
            None | Some(Region::TranslationBlock { .. } | Region::TranslatedElement)
        );
        if !text_context {
            return;
        }
        if let Some(kind) = BlockKind::from_opener(&state.word, !state.has_args) {
            if let Some(Region::TranslationBlock { kind: top, depth }) = self.stack.last_mut()
                && *top == kind
            {
                *depth += 1;
                return;
            }
            self.stack.push(Region::TranslationBlock { kind, depth: 1 });
        } else if let Some(kind) = BlockKind::from_closer(&state.word)
            && let Some(Region::TranslationBlock { kind: top, depth }) = self.stack.last_mut()
            && *top == kind
        {
            *depth -= 1;
            if *depth == 0 {
                self.stack.pop();
            }
        }
    }

    // --- end of input ----------------------------------------------------

    fn finish(&mut self) -> Option<Finding> {
        if self.done {
            return None;
        }
        self.done = true;
        match self.stack.last() {
            // An unterminated comment still decides the fate of the text it
            // interrupted.
            Some(Region::Comment { body, .. }) => {
                if body.contains("notrans") {
                    self.deferred = None;
                }
                self.deferred.take()
            }
            None => self.flush(),
            // Any other unterminated region swallows the trailing content.
            Some(_) => None,
        }
    }
}

impl Iterator for Scanner {
    type Item = Finding;

    fn next(&mut self) -> Option<Finding> {
        if self.done {
            return None;
        }
        loop {
            if self.cursor.pos >= self.chars.len() {
                return self.finish();
            }
            let emitted = match self.mode() {
                Mode::Text { collect } => self.step_text(collect),
                Mode::Tag => self.step_tag(),
                Mode::AttrValue(end) => self.step_attr_value(end),
                Mode::Script => self.step_script(),
                Mode::Comment => self.step_comment(),
                Mode::TemplateTag => self.step_template_tag(),
                Mode::Delimited(close) => {
                    if self.lookahead(close) {
                        self.bump_n(close.len());
                        self.stack.pop();
                    } else {
                        self.bump();
                    }
                    None
                }
            };
            if emitted.is_some() {
                return emitted;
            }
        }
    }
}

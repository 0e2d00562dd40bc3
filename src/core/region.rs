//! Exclusion regions and the lookup tables that drive them.
//!
//! Every stretch of input that must not be reported is modelled as one
//! variant of [`Region`], pushed onto the scanner's stack when its opening
//! delimiter is seen and popped by the matching closer. The top of the stack
//! is the active interpretation mode; an empty stack means plain text.

/// What terminates the attribute value currently being skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttrEnd {
    /// Quoted value, ended by the same quote character.
    Quote(char),
    /// Bare value, ended by whitespace or the closing `>`.
    Unquoted,
}

/// The two translation block families. Same-named blocks nest by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Trans,
    Blocktrans,
}

impl BlockKind {
    /// Keyword that opens a block of this kind.
    ///
    /// `blocktrans` always opens a block. `trans` opens one only in its bare
    /// form: with arguments (`{% trans 'Foo' %}`) the string lives inside the
    /// tag itself, which is already opaque, and no end tag follows.
    pub fn from_opener(word: &str, bare: bool) -> Option<Self> {
        match word {
            "blocktrans" => Some(Self::Blocktrans),
            "trans" if bare => Some(Self::Trans),
            _ => None,
        }
    }

    pub fn from_closer(word: &str) -> Option<Self> {
        match word {
            "endblocktrans" => Some(Self::Blocktrans),
            "endtrans" => Some(Self::Trans),
            _ => None,
        }
    }
}

/// Parsing state for the interior of a `< … >` tag.
///
/// Names are lowercased as they accumulate; HTML tag and attribute names are
/// case-insensitive.
#[derive(Debug)]
pub(crate) struct TagState {
    pub closing: bool,
    pub name: String,
    pub name_done: bool,
    /// An attribute marking this element's content as translated was seen.
    pub translate: bool,
    /// The last significant character was `/` (self-closing candidate).
    pub slash: bool,
    /// Attribute name currently accumulating.
    pub attr: String,
}

impl TagState {
    pub fn new(closing: bool) -> Self {
        Self {
            closing,
            name: String::new(),
            name_done: false,
            translate: false,
            slash: false,
            attr: String::new(),
        }
    }

    /// State for a closing tag whose name is already known, used when a
    /// script body hands control back to tag parsing at `</script`.
    pub fn closing_named(name: &str) -> Self {
        Self {
            closing: true,
            name: name.to_string(),
            name_done: true,
            translate: false,
            slash: false,
            attr: String::new(),
        }
    }
}

/// First-keyword capture for a `{% … %}` tag.
#[derive(Debug, Default)]
pub(crate) struct TemplateTagState {
    /// First word of the tag body, lowercased.
    pub word: String,
    pub word_done: bool,
    /// Any non-whitespace content followed the first word.
    pub has_args: bool,
}

/// One active exclusion context.
#[derive(Debug)]
pub(crate) enum Region {
    /// Inside `< … >`.
    RawTag(TagState),
    /// Inside an attribute value; never reportable.
    AttrValue(AttrEnd),
    /// Inside `<script>…</script>`; scanned verbatim.
    ScriptBody,
    /// Inside `<!-- -->` or `{# #}`. The body is kept so a `notrans` marker
    /// can cancel the preceding pending text.
    Comment { close: &'static str, body: String },
    /// Inside `{% … %}`.
    TemplateTag(TemplateTagState),
    /// Inside `{{ … }}`.
    TemplateVar,
    /// Inside `{[{ … }]}` or the legacy `[[ … ]]` bracket form.
    Interpolation { close: &'static str },
    /// Between a translation block opener and its matching closer.
    TranslationBlock { kind: BlockKind, depth: u32 },
    /// Content of an element carrying a translate-marker attribute.
    TranslatedElement,
}

/// Attribute names that declare an element's content as handled by a
/// translation mechanism.
///
/// `translate` itself and the `-translate` suffix convention are always
/// recognized; projects can add further exact names. The matching rule is
/// deliberately narrow: directive-ish names such as `aa-collapsable` must
/// not suppress content.
#[derive(Debug, Clone, Default)]
pub struct TranslateMarkers {
    extra: Vec<String>,
}

impl TranslateMarkers {
    pub fn new(extra: impl IntoIterator<Item = String>) -> Self {
        Self {
            extra: extra
                .into_iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
        }
    }

    /// `attr` must already be lowercased.
    pub fn matches(&self, attr: &str) -> bool {
        attr == "translate"
            || attr.ends_with("-translate")
            || self.extra.iter().any(|name| name == attr)
    }
}

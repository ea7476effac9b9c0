//! Syntax configuration.
//!
//! A syntax is an ordered list of tokens, each being a regular expression paired with
//! a highlight class. All tokens of a syntax are folded into a single regular
//! expression in which each token occupies its own named capture group, so earlier
//! tokens take precedence over later ones when both match at the same position.
//!
//! A set of syntaxes is built in, and further syntaxes may be loaded from a directory
//! of TOML files formatted as follows:
//!
//! ```toml
//! [id]
//! name = "lua"
//! extensions = ["lua"]
//!
//! [tokens]
//! "--[^\n]*" = "comment"
//! "\\b(?:local|function|end)\\b" = "keyword"
//! ```

use crate::error::{Error, Result};
use crate::sys::AsString;
use indexmap::IndexMap;
use regex_lite::{Captures, Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

/// The language of files whose extension is unknown, which has no tokens.
pub const PLAINTEXT: &str = "plaintext";

/// A syntax configuration.
#[derive(Clone, Debug)]
pub struct Syntax {
    /// The canonical name of the syntax configuration.
    pub name: String,

    /// A single regular expression aggregating all token definitions, each adorned
    /// with its own capture group name, or `None` if there are no tokens.
    pub re: Option<Regex>,

    /// A collection of token definitions whose order is crucial since
    /// [`re`](Self::re) is constructed in the order of iteration.
    tokens: Vec<Token>,
}

#[derive(Clone, Debug)]
struct Token {
    /// The unique capture group name assigned to this token.
    name: String,

    /// The highlight class of text matching this token.
    class: String,
}

impl Syntax {
    /// Creates a new syntax identified by `name` and using `tokens`, which are
    /// tuples containing a regular expression and a highlight class.
    ///
    /// If any of the regular expressions are malformed or the aggregate size of all
    /// regular expressions is too large, then an error is returned.
    pub fn new(name: &str, tokens: Vec<(String, String)>) -> Result<Syntax> {
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(i, (pattern, class))| (format!("_{i}"), pattern, class))
            .collect::<Vec<_>>();

        let re = if tokens.is_empty() {
            None
        } else {
            let pattern = tokens
                .iter()
                .map(|(name, pattern, _)| format!("(?<{name}>{pattern})"))
                .collect::<Vec<_>>()
                .join("|");
            let re = RegexBuilder::new(&pattern)
                .multi_line(true)
                .build()
                .map_err(|e| Error::invalid_regex(&pattern, &e))?;
            Some(re)
        };

        let tokens = tokens
            .into_iter()
            .map(|(name, _, class)| Token { name, class })
            .collect();
        Ok(Syntax {
            name: name.to_string(),
            re,
            tokens,
        })
    }

    /// Creates a syntax with no tokens.
    pub fn plain(name: &str) -> Syntax {
        Syntax {
            name: name.to_string(),
            re: None,
            tokens: Vec::new(),
        }
    }

    /// Returns the highlight class and the byte offset range for the matching
    /// capture group `cap`, or `None` if no token capture group matched.
    pub fn lookup<'a>(&'a self, cap: &Captures) -> Option<(&'a str, Range<usize>)> {
        self.tokens.iter().find_map(|token| {
            cap.name(&token.name)
                .map(|m| (token.class.as_str(), m.range()))
        })
    }
}

/// A collection of syntaxes keyed by language name, along with the file extensions
/// associated with each.
pub struct Registry {
    syntax_map: HashMap<String, Syntax>,
    ext_map: HashMap<String, String>,
}

pub type RegistryRef = Rc<Registry>;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExternalSyntax {
    id: ExternalId,
    tokens: Option<IndexMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExternalId {
    name: String,
    extensions: Vec<String>,
}

impl Registry {
    /// Returns a registry containing only the built-in syntaxes.
    pub fn load() -> Result<Registry> {
        let mut syntax_map = HashMap::new();
        for (name, tokens) in BUILTIN_TOKENS {
            let tokens = tokens
                .iter()
                .map(|(pattern, class)| (pattern.to_string(), class.to_string()))
                .collect();
            syntax_map.insert(name.to_string(), Syntax::new(name, tokens)?);
        }
        syntax_map.insert(PLAINTEXT.to_string(), Syntax::plain(PLAINTEXT));
        Ok(Registry {
            syntax_map,
            ext_map: HashMap::new(),
        })
    }

    /// Returns a registry containing the built-in syntaxes as well as syntaxes
    /// loaded from `*.toml` files in `dir`, where the latter replace built-in
    /// syntaxes of the same name.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Registry> {
        let dir = dir.as_ref();
        let mut registry = Registry::load()?;
        let entries = fs::read_dir(dir).map_err(|e| Error::io(&dir.as_string(), e))?;
        let mut paths = entries
            .flat_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect::<Vec<_>>();
        paths.sort();
        for path in paths {
            registry.add_file(&path)?;
        }
        Ok(registry)
    }

    fn add_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(&path.as_string(), e))?;
        let ext_syntax = toml::from_str::<ExternalSyntax>(&content)
            .map_err(|e| Error::syntax(&path.as_string(), &e))?;
        let tokens = ext_syntax
            .tokens
            .unwrap_or_default()
            .into_iter()
            .collect::<Vec<_>>();
        let name = ext_syntax.id.name;
        let syntax = Syntax::new(&name, tokens)?;
        for ext in ext_syntax.id.extensions {
            self.ext_map.insert(ext, name.clone());
        }
        info!(path = %path.as_string(), name = %name, "syntax loaded");
        self.syntax_map.insert(name, syntax);
        Ok(())
    }

    /// Turns the registry into a [`RegistryRef`].
    pub fn to_ref(self) -> RegistryRef {
        Rc::new(self)
    }

    /// Returns the syntax for the language `name`.
    pub fn find(&self, name: &str) -> Option<&Syntax> {
        self.syntax_map.get(name)
    }

    /// Returns the language of `path`, consulting extensions of loaded syntaxes
    /// before the built-in table.
    pub fn language_of<P: AsRef<Path>>(&self, path: P) -> String {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.ext_map.get(ext))
            .cloned()
            .unwrap_or_else(|| language_of(path).to_string())
    }
}

/// Returns the language of `path` according to its extension, or [`PLAINTEXT`] if
/// the extension is missing or unknown.
pub fn language_of<P: AsRef<Path>>(path: P) -> &'static str {
    let path = path.as_ref();
    let lang = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let ext = ext.to_ascii_lowercase();
            EXTENSIONS
                .iter()
                .find(|(_, exts)| exts.contains(&ext.as_str()))
                .map(|(lang, _)| *lang)
        });
    match lang {
        Some(lang) => lang,
        None => {
            debug!(path = %path.as_string(), "no language for extension");
            PLAINTEXT
        }
    }
}

const EXTENSIONS: [(&str, &[&str]); 13] = [
    ("rust", &["rs"]),
    ("javascript", &["js", "mjs", "cjs", "jsx"]),
    ("typescript", &["ts", "mts", "cts", "tsx"]),
    ("python", &["py", "pyi"]),
    ("json", &["json"]),
    ("toml", &["toml"]),
    ("c", &["c", "h"]),
    ("cpp", &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
    ("go", &["go"]),
    ("shell", &["sh", "bash", "zsh"]),
    ("markdown", &["md", "markdown"]),
    ("html", &["html", "htm"]),
    ("css", &["css"]),
];

const LINE_COMMENT: &str = r"//[^\n]*";
const HASH_COMMENT: &str = r"#[^\n]*";
const BLOCK_COMMENT: &str = r"/\*(?s:.*?)\*/";
const DQ_STRING: &str = r#""(?:[^"\\\n]|\\.)*""#;
const SQ_STRING: &str = r"'(?:[^'\\\n]|\\.)*'";
const BT_STRING: &str = r"`(?:[^`\\]|\\.)*`";
const NUMBER: &str = r"\b(?:0[xX][0-9a-fA-F_]+|\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";
const TYPE_NAME: &str = r"\b[A-Z][A-Za-z0-9_]*\b";

const RUST_KEYWORDS: &str = r"\b(?:as|async|await|break|const|continue|crate|dyn|else|enum|extern|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|type|unsafe|use|where|while)\b";
const JS_KEYWORDS: &str = r"\b(?:async|await|break|case|catch|class|const|continue|default|delete|do|else|export|extends|finally|for|from|function|if|import|in|instanceof|let|new|of|return|static|super|switch|this|throw|try|typeof|var|void|while|yield)\b";
const TS_KEYWORDS: &str = r"\b(?:abstract|as|async|await|break|case|catch|class|const|continue|declare|default|do|else|enum|export|extends|finally|for|from|function|if|implements|import|in|interface|keyof|let|namespace|new|private|protected|public|readonly|return|static|super|switch|this|throw|try|type|typeof|var|while|yield)\b";
const PYTHON_KEYWORDS: &str = r"\b(?:and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b";
const C_KEYWORDS: &str = r"\b(?:auto|break|case|char|const|continue|default|do|double|else|enum|extern|float|for|goto|if|inline|int|long|register|return|short|signed|sizeof|static|struct|switch|typedef|union|unsigned|void|volatile|while)\b";
const CPP_KEYWORDS: &str = r"\b(?:auto|bool|break|case|catch|char|class|const|constexpr|continue|default|delete|do|double|else|enum|explicit|extern|float|for|friend|if|inline|int|long|namespace|new|noexcept|operator|private|protected|public|return|short|signed|sizeof|static|struct|switch|template|this|throw|try|typedef|typename|union|unsigned|using|virtual|void|volatile|while)\b";
const GO_KEYWORDS: &str = r"\b(?:break|case|chan|const|continue|default|defer|else|fallthrough|for|func|go|goto|if|import|interface|map|package|range|return|select|struct|switch|type|var)\b";
const SHELL_KEYWORDS: &str = r"\b(?:case|do|done|elif|else|esac|export|fi|for|function|if|in|local|return|then|until|while)\b";

const RUST_TOKENS: &[(&str, &str)] = &[
    (r"///[^\n]*", "doc"),
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (DQ_STRING, "string"),
    (r"'(?:[^'\\\n]|\\.)'", "string"),
    (r"#!?\[[^\]\n]*\]", "meta"),
    (RUST_KEYWORDS, "keyword"),
    (r"\b(?:true|false)\b", "literal"),
    (r"\b[a-z_][a-z0-9_]*!", "function"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const JS_TOKENS: &[(&str, &str)] = &[
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (BT_STRING, "string"),
    (JS_KEYWORDS, "keyword"),
    (r"\b(?:true|false|null|undefined|NaN)\b", "literal"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const TS_TOKENS: &[(&str, &str)] = &[
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (BT_STRING, "string"),
    (r"@[A-Za-z_]\w*", "meta"),
    (TS_KEYWORDS, "keyword"),
    (r"\b(?:true|false|null|undefined)\b", "literal"),
    (r"\b(?:any|boolean|never|number|string|unknown|void)\b", "builtin"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const PYTHON_TOKENS: &[(&str, &str)] = &[
    (HASH_COMMENT, "comment"),
    (r#""""(?s:.*?)""""#, "string"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (r"^[ \t]*@[A-Za-z_][\w.]*", "meta"),
    (PYTHON_KEYWORDS, "keyword"),
    (r"\b(?:True|False|None)\b", "literal"),
    (r"\b(?:print|len|range|self|super)\b", "builtin"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const JSON_TOKENS: &[(&str, &str)] = &[
    (r#""(?:[^"\\\n]|\\.)*"[ \t]*:"#, "attr"),
    (DQ_STRING, "string"),
    (r"\b(?:true|false|null)\b", "literal"),
    (r"-?\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b", "number"),
];

const TOML_TOKENS: &[(&str, &str)] = &[
    (HASH_COMMENT, "comment"),
    (r"^[ \t]*\[\[?[^\]\n]*\]\]?", "section"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (r"^[ \t]*[A-Za-z0-9_.-]+", "attr"),
    (r"\b(?:true|false)\b", "literal"),
    (NUMBER, "number"),
];

const C_TOKENS: &[(&str, &str)] = &[
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (r"^[ \t]*#[ \t]*[a-z]+", "meta"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (C_KEYWORDS, "keyword"),
    (r"\b(?:NULL|true|false)\b", "literal"),
    (NUMBER, "number"),
];

const CPP_TOKENS: &[(&str, &str)] = &[
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (r"^[ \t]*#[ \t]*[a-z]+", "meta"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (CPP_KEYWORDS, "keyword"),
    (r"\b(?:nullptr|true|false)\b", "literal"),
    (r"\bstd::[A-Za-z_]\w*", "builtin"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const GO_TOKENS: &[(&str, &str)] = &[
    (LINE_COMMENT, "comment"),
    (BLOCK_COMMENT, "comment"),
    (DQ_STRING, "string"),
    (BT_STRING, "string"),
    (SQ_STRING, "string"),
    (GO_KEYWORDS, "keyword"),
    (r"\b(?:true|false|nil|iota)\b", "literal"),
    (r"\b(?:append|cap|len|make|new|panic|recover)\b", "builtin"),
    (TYPE_NAME, "type"),
    (NUMBER, "number"),
];

const SHELL_TOKENS: &[(&str, &str)] = &[
    (r"^#![^\n]*", "meta"),
    (r"(?:^|[ \t])#[^\n]*", "comment"),
    (DQ_STRING, "string"),
    (r"'[^'\n]*'", "string"),
    (r"\$\{[^}\n]*\}|\$[A-Za-z_0-9@#?$!*-]\w*", "variable"),
    (SHELL_KEYWORDS, "keyword"),
    (r"\b(?:cd|echo|exit|printf|read|set|shift|source|test|unset)\b", "builtin"),
    (NUMBER, "number"),
];

const MARKDOWN_TOKENS: &[(&str, &str)] = &[
    (r"^```[^\n]*\n(?s:.*?)^```", "string"),
    (r"^#{1,6}[ \t][^\n]*", "section"),
    (r"`[^`\n]+`", "string"),
    (r"^[ \t]*(?:[-*+]|\d+\.)[ \t]", "bullet"),
    (r"!?\[[^\]\n]*\]\([^)\n]*\)", "link"),
    (r"\*\*[^*\n]+\*\*|__[^_\n]+__", "keyword"),
    (r"^>[^\n]*", "comment"),
];

const HTML_TOKENS: &[(&str, &str)] = &[
    (r"<!--(?s:.*?)-->", "comment"),
    (r"<!DOCTYPE[^>\n]*>", "meta"),
    (r"</?[A-Za-z][A-Za-z0-9-]*|/?>", "tag"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (r"\b[A-Za-z-]+=", "attr"),
    (r"&[A-Za-z0-9#]+;", "symbol"),
];

const CSS_TOKENS: &[(&str, &str)] = &[
    (BLOCK_COMMENT, "comment"),
    (DQ_STRING, "string"),
    (SQ_STRING, "string"),
    (r"@[A-Za-z-]+", "keyword"),
    (r"#[0-9a-fA-F]{3,8}\b", "number"),
    (r"[.#][A-Za-z_-][A-Za-z0-9_-]*", "selector"),
    (r"\b[a-z-]+[ \t]*:", "attr"),
    (r"-?\b\d+(?:\.\d+)?(?:px|em|rem|vh|vw|%|s|ms)?", "number"),
    (r"!important\b", "keyword"),
];

const BUILTIN_TOKENS: [(&str, &[(&str, &str)]); 13] = [
    ("rust", RUST_TOKENS),
    ("javascript", JS_TOKENS),
    ("typescript", TS_TOKENS),
    ("python", PYTHON_TOKENS),
    ("json", JSON_TOKENS),
    ("toml", TOML_TOKENS),
    ("c", C_TOKENS),
    ("cpp", CPP_TOKENS),
    ("go", GO_TOKENS),
    ("shell", SHELL_TOKENS),
    ("markdown", MARKDOWN_TOKENS),
    ("html", HTML_TOKENS),
    ("css", CSS_TOKENS),
];

#[cfg(test)]
pub mod tests {
    use super::*;

    const NAME: &str = "foo";

    const TOKENS: [(&str, &str); 3] = [
        (r#"-?\d+(?:\.\d+)?(?:[eE]-?\d+)?"#, "number"),
        (r#""(?:[^"\\]|(?:\\.))*""#, "string"),
        (r#"\b(?:foo|bar)\b"#, "keyword"),
    ];

    #[test]
    fn new_syntax() {
        let syntax = build_syntax();
        assert_eq!(syntax.name, NAME);
        assert_eq!(syntax.tokens.len(), TOKENS.len());
        for (i, token) in syntax.tokens.iter().enumerate() {
            assert_eq!(token.name, format!("_{i}"));
            assert_eq!(token.class, TOKENS[i].1);
        }
        assert!(syntax.re.is_some());
    }

    #[test]
    fn new_syntax_empty() {
        let syntax = Syntax::new(NAME, Vec::new()).unwrap();
        assert_eq!(syntax.name, NAME);
        assert_eq!(syntax.tokens.len(), 0);
        assert!(syntax.re.is_none());
    }

    #[test]
    fn invalid_token() {
        let tokens = vec![("(bad".to_string(), "keyword".to_string())];
        let syntax = Syntax::new(NAME, tokens);
        assert!(matches!(syntax, Err(Error::InvalidRegex { .. })));
    }

    #[test]
    fn lookup_capture() {
        let syntax = build_syntax();
        let re = syntax.re.as_ref().unwrap();
        let cap = re.captures(r#"x = "bar""#).unwrap();
        assert_eq!(syntax.lookup(&cap), Some(("string", 4..9)));
    }

    #[test]
    fn builtin_syntaxes_compile() {
        let registry = Registry::load().unwrap();
        for (name, _) in EXTENSIONS {
            assert!(registry.find(name).is_some(), "{name}: syntax missing");
        }
        assert!(registry.find(PLAINTEXT).unwrap().re.is_none());
    }

    #[test]
    fn languages_from_extensions() {
        assert_eq!(language_of("src/main.rs"), "rust");
        assert_eq!(language_of("index.TSX"), "typescript");
        assert_eq!(language_of("/etc/app/config.toml"), "toml");
        assert_eq!(language_of("notes.txt"), PLAINTEXT);
        assert_eq!(language_of("Makefile"), PLAINTEXT);
    }

    #[test]
    fn load_syntax_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("lua.toml"),
            r#"
[id]
name = "lua"
extensions = ["lua"]

[tokens]
"--[^\n]*" = "comment"
"\\b(?:local|function|end)\\b" = "keyword"
"#,
        )
        .unwrap();
        fs::write(dir.path().join("ignored.txt"), "not a syntax").unwrap();

        let registry = Registry::load_dir(dir.path()).unwrap();
        let syntax = registry.find("lua").unwrap();
        assert_eq!(syntax.tokens.len(), 2);
        assert_eq!(registry.language_of("init.lua"), "lua");
        assert_eq!(registry.language_of("main.rs"), "rust");
    }

    #[test]
    fn load_invalid_syntax_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.toml"), "[id]\nname = \"bad\"\n").unwrap();
        assert!(matches!(
            Registry::load_dir(dir.path()),
            Err(Error::Syntax { .. })
        ));
    }

    pub fn build_syntax() -> Syntax {
        Syntax::new(NAME, build_tokens()).unwrap()
    }

    fn build_tokens() -> Vec<(String, String)> {
        TOKENS
            .iter()
            .map(|(pattern, class)| (pattern.to_string(), class.to_string()))
            .collect()
    }
}

//! Path templates for tracked files.
//!
//! A template mixes literal text with two placeholders:
//! - `@lang`: one of the configured locale langs.
//! - `@path`: the remainder of the path (may contain `/`).
//!
//! When `@lang` sits next to a `/`, that segment is optional and a path
//! without it belongs to the default locale (root locale layout). The shared
//! path drops the lang segment, so `docs/fr/guide.md` and `docs/guide.md`
//! both map to `docs/guide.md` for the template `docs/@lang/@path`.

use regex::Regex;

const LANG: &str = "@lang";
const PATH: &str = "@path";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Lit(String),
    /// Lang segment that may be absent, along with one adjacent `/`.
    OptionalLang { slash_after: bool },
    Lang,
    Path,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Parameters captured from a matching path.
pub struct PathParams {
    pub lang: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    regex: Regex,
    tokens: Vec<Token>,
}

impl PathResolver {
    /// Compile `pattern` for the given locale langs.
    pub fn new(pattern: &str, langs: &[&str]) -> Result<Self, String> {
        if pattern.trim().is_empty() {
            return Err("pattern must not be empty".to_string());
        }
        if pattern.matches(LANG).count() > 1 || pattern.matches(PATH).count() > 1 {
            return Err(format!(
                "pattern `{}` may use `@lang` and `@path` at most once each",
                pattern
            ));
        }
        let tokens = tokenize(pattern);
        let mut alts: Vec<&str> = langs.to_vec();
        // Longest first so `pt-BR` wins over `pt`.
        alts.sort_by_key(|l| std::cmp::Reverse(l.len()));
        let alts = alts
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        let mut src = String::from("^");
        for t in &tokens {
            match t {
                Token::Lit(s) => src.push_str(&regex::escape(s)),
                Token::OptionalLang { slash_after: true } => {
                    src.push_str(&format!("(?:(?P<lang>{})/)?", alts))
                }
                Token::OptionalLang { slash_after: false } => {
                    src.push_str(&format!("(?:/(?P<lang>{}))?", alts))
                }
                Token::Lang => src.push_str(&format!("(?P<lang>{})", alts)),
                Token::Path => src.push_str("(?P<path>.+)"),
            }
        }
        src.push('$');
        let regex = Regex::new(&src).map_err(|e| e.to_string())?;
        Ok(Self { regex, tokens })
    }

    /// Captured parameters when `path` matches the template.
    pub fn is_match(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        Some(PathParams {
            lang: caps.name("lang").map(|m| m.as_str().to_string()),
            path: caps.name("path").map(|m| m.as_str().to_string()),
        })
    }

    /// Locale-independent key for `path`, or `None` when it does not match.
    pub fn to_shared_path(&self, path: &str) -> Option<String> {
        let params = self.is_match(path)?;
        let mut out = String::new();
        for t in &self.tokens {
            match t {
                Token::Lit(s) => out.push_str(s),
                Token::Path => out.push_str(params.path.as_deref().unwrap_or_default()),
                Token::OptionalLang { .. } | Token::Lang => {}
            }
        }
        Some(out)
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut raw: Vec<Token> = Vec::new();
    let mut rest = pattern;
    while !rest.is_empty() {
        let next = [LANG, PATH]
            .iter()
            .filter_map(|ph| rest.find(ph).map(|i| (i, *ph)))
            .min_by_key(|(i, _)| *i);
        match next {
            Some((i, ph)) => {
                if i > 0 {
                    raw.push(Token::Lit(rest[..i].to_string()));
                }
                raw.push(if ph == LANG { Token::Lang } else { Token::Path });
                rest = &rest[i + ph.len()..];
            }
            None => {
                raw.push(Token::Lit(rest.to_string()));
                rest = "";
            }
        }
    }

    // Fold one slash adjacent to `@lang` into an optional segment.
    let mut out: Vec<Token> = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == Token::Lang {
            if let Some(Token::Lit(next)) = raw.get(i + 1) {
                if let Some(stripped) = next.strip_prefix('/') {
                    out.push(Token::OptionalLang { slash_after: true });
                    if !stripped.is_empty() {
                        out.push(Token::Lit(stripped.to_string()));
                    }
                    i += 2;
                    continue;
                }
            }
            if let Some(Token::Lit(prev)) = out.last_mut() {
                if prev.ends_with('/') {
                    prev.pop();
                    if prev.is_empty() {
                        out.pop();
                    }
                    out.push(Token::OptionalLang { slash_after: false });
                    i += 1;
                    continue;
                }
            }
        }
        out.push(raw[i].clone());
        i += 1;
    }
    out
}

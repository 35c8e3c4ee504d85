//! Python language support via ast-grep-language.

pub use ast_grep_language::SupportLang;

/// The language every tree in this crate is built from.
pub fn python() -> SupportLang {
    SupportLang::Python
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast_grep_core::AstGrep;

    #[test]
    fn python_lang_parses() {
        let sg = AstGrep::new("x = 1", python());
        assert_eq!(sg.root().kind(), "module");
    }

    #[test]
    fn python_lang_metavars() {
        let sg = AstGrep::new("a = foo.bar(1)\nb = baz.bar(2)\n", python());
        let root = sg.root();

        assert!(root.find("foo.bar($ARG)").is_some(), "single metavar");
        assert_eq!(root.find_all("$OBJ.bar($$$)").count(), 2, "variadic args");
        assert!(root.find("qux($_)").is_none());
    }
}

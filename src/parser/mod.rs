//! Doc-comment scanner for Java, Kotlin and Swift sources.
//!
//! One forward pass splits the buffer into code, comments and literals,
//! collects doc-comments, classifies the declarations that follow them and
//! tracks which type each declaration belongs to. Malformed input never
//! fails the scan; whatever cannot be used is dropped and counted in
//! [`Diagnostics`](crate::model::Diagnostics).

mod assemble;
mod classify;
mod cursor;
mod doc_comment;
mod nesting;
mod region;
mod scanner;

pub use nesting::DEFAULT_MAX_NESTING;

use crate::model::{AccessLevel, Language, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Undocumented members below this level are left out.
    pub min_access: AccessLevel,
    /// Cap on tracked type nesting.
    pub max_nesting: usize,
    /// Overrides the language derived from the file name.
    pub language: Option<Language>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            min_access: AccessLevel::Private,
            max_nesting: DEFAULT_MAX_NESTING,
            language: None,
        }
    }
}

/// Parse `buf`, displayed as `name`, keeping members at `min_access` or above.
pub fn parse(buf: Vec<u8>, name: &str, min_access: AccessLevel) -> Source {
    parse_with(
        buf,
        name,
        &ParseOptions {
            min_access,
            ..Default::default()
        },
    )
}

pub fn parse_with(buf: Vec<u8>, name: &str, options: &ParseOptions) -> Source {
    let mut source = Source::new(name, buf);
    if let Some(language) = options.language {
        source.language = language;
    }
    scanner::scan(&mut source, options);
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclKind, Declaration, Dialect, TypeKind};

    fn java(input: &str) -> Source {
        parse(input.as_bytes().to_vec(), "Test.java", AccessLevel::Private)
    }

    fn name<'a>(source: &'a Source, decl: &Declaration) -> std::borrow::Cow<'a, str> {
        source.opt_text(decl.name).unwrap_or_default()
    }

    fn code<'a>(source: &'a Source, decl: &Declaration) -> std::borrow::Cow<'a, str> {
        source.opt_text(decl.main.code).unwrap_or_default()
    }

    #[test]
    fn documented_public_method() {
        let source = java("/** text */\npublic void foo() { }\n");
        assert_eq!(source.declarations.len(), 1);
        let decl = &source.declarations[0];
        assert_eq!(decl.access, AccessLevel::Public);
        assert_eq!(decl.kind, DeclKind::Method);
        assert_eq!(source.opt_text(decl.main.comment).as_deref(), Some("text"));
        assert_eq!(name(&source, decl), "foo");
        assert_eq!(code(&source, decl), "public void foo()");
    }

    #[test]
    fn params_and_return_are_pooled() {
        let source = java(
            "/**\n * Adds.\n * @param a first\n * @param b second\n * @return the sum\n */\nint add(int a, int b) { return a + b; }\n",
        );
        let decl = &source.declarations[0];
        let params = source.params_of(decl);
        assert_eq!(params.len(), 2);
        assert_eq!(source.opt_text(params[0].code).as_deref(), Some("a"));
        assert_eq!(source.opt_text(params[1].comment).as_deref(), Some("second"));
        let ret = decl.return_tag.unwrap();
        assert_eq!(source.opt_text(ret.comment).as_deref(), Some("the sum"));
        let lines: Vec<_> = source
            .description_of(decl)
            .iter()
            .map(|l| source.opt_text(*l).unwrap_or_default())
            .collect();
        assert_eq!(lines, vec!["Adds."]);
    }

    #[test]
    fn members_point_at_their_class() {
        let source = java("class Outer {\n  /** m */\n  void inner() {}\n}\n");
        assert_eq!(source.declarations.len(), 2);
        assert_eq!(source.declarations[0].kind, DeclKind::Type(TypeKind::Class));
        assert_eq!(source.declarations[1].parent, Some(0));
        assert_eq!(source.opt_text(source.class_name).as_deref(), Some("Outer"));
    }

    #[test]
    fn field_code_stops_before_initializer() {
        let source = java("private final int x = 5;\n");
        let decl = &source.declarations[0];
        assert_eq!(decl.kind, DeclKind::Field);
        assert_eq!(decl.access, AccessLevel::Private);
        assert!(decl.modifiers.is_final);
        assert_eq!(code(&source, decl), "private final int x");
    }

    #[test]
    fn multibyte_literal_does_not_confuse_scanning() {
        let source = java("class A {\n  String s = \"caf\u{e9}\";\n  /** doc */\n  public void f() {}\n}\n");
        let names: Vec<_> = source.declarations.iter().map(|d| name(&source, d)).collect();
        assert_eq!(names, vec!["A", "s", "f"]);
        assert_eq!(source.declarations[2].parent, Some(0));
    }

    #[test]
    fn minimum_access_filters_undocumented_members() {
        let input = "public class A {\n  private int hidden;\n  int pkg;\n  /** kept */\n  private int documented;\n  public int shown;\n}\n";
        let source = parse(input.as_bytes().to_vec(), "A.java", AccessLevel::Public);
        let names: Vec<_> = source.declarations.iter().map(|d| name(&source, d)).collect();
        assert_eq!(names, vec!["A", "documented", "shown"]);
        assert_eq!(source.diagnostics.below_access, 2);
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = "package p;\n/** A */\npublic class A extends B implements C {\n  /** f */\n  A() {}\n}\n";
        let a = java(input);
        let b = java(input);
        assert_eq!(a.declarations, b.declarations);
        assert_eq!(a.params, b.params);
        assert_eq!(a.description_lines, b.description_lines);
        assert_eq!(a.declarations[1].kind, DeclKind::Constructor);
        assert_eq!(a.opt_text(a.package_name).as_deref(), Some("p"));
        assert_eq!(a.opt_text(a.extends_name).as_deref(), Some("B"));
        assert_eq!(a.implements_names.len(), 1);
        assert!(a.declarations[0].inherits);
    }

    #[test]
    fn spans_stay_in_bounds_on_truncated_input() {
        let inputs = [
            "/** never closed",
            "/** @param",
            "class A { void f(",
            "\"unterminated",
            "public int x = ",
            "}}}{{{",
            "/**/ /*** x */ /** y */",
        ];
        for input in inputs {
            let source = java(input);
            let len = source.bytes().len();
            for decl in &source.declarations {
                for span in [decl.name, decl.main.code, decl.main.comment].into_iter().flatten() {
                    assert!(span.start <= span.end && span.end < len, "{input:?}");
                }
            }
        }
    }

    #[test]
    fn orphans_and_truncated_tags_are_counted() {
        let source = java("/** first */\n/** second @param */\nint x;\n/** trailing */\n");
        assert_eq!(source.declarations.len(), 1);
        assert_eq!(source.opt_text(source.declarations[0].main.comment).as_deref(), Some("second @param"));
        assert_eq!(source.diagnostics.orphan_comments, 2);
    }

    #[test]
    fn doc_comments_inside_bodies_are_ignored() {
        let source = java("class A {\n  void f() {\n    /** not docs */\n    int local;\n  }\n}\n");
        assert_eq!(source.declarations.len(), 2);
        assert!(!source.declarations[1].has_doc());
        assert_eq!(source.diagnostics.orphan_comments, 0);
    }

    #[test]
    fn kotlin_source() {
        let input = "package demo\n\n/** A box. */\nclass Box(val size: Int) {\n    /** Area. */\n    val area = size * size\n    /**\n     * Grows.\n     * @param by amount\n     */\n    fun grow(by: Int): Box = Box(size + by)\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Box.kt", AccessLevel::Public);
        assert_eq!(source.opt_text(source.package_name).as_deref(), Some("demo"));
        let kinds: Vec<_> = source.declarations.iter().map(|d| (name(&source, d).into_owned(), d.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Box".to_string(), DeclKind::Type(TypeKind::Class)),
                ("area".to_string(), DeclKind::Field),
                ("grow".to_string(), DeclKind::Method),
            ]
        );
        let grow = &source.declarations[2];
        assert_eq!(grow.dialect, Some(Dialect::Kotlin));
        assert_eq!(grow.access, AccessLevel::Public);
        assert_eq!(source.params_of(grow).len(), 1);
        assert_eq!(code(&source, grow), "fun grow(by: Int): Box");
    }

    #[test]
    fn swift_source() {
        let input = "/// line docs are ignored\n/** A shape. */\npublic protocol Shape {\n    /** Area. */\n    func area() -> Double\n}\n\n/** Square. */\npublic struct Square: Shape {\n    /** Side. */\n    public let side: Double\n    /** Make one. */\n    public init(side: Double) {\n        self.side = side\n    }\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Shapes.swift", AccessLevel::Public);
        let kinds: Vec<_> = source.declarations.iter().map(|d| (name(&source, d).into_owned(), d.kind, d.parent)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Shape".to_string(), DeclKind::Type(TypeKind::Interface), None),
                ("area".to_string(), DeclKind::Method, Some(0)),
                ("Square".to_string(), DeclKind::Type(TypeKind::Struct), None),
                ("side".to_string(), DeclKind::Field, Some(2)),
                ("init".to_string(), DeclKind::Constructor, Some(2)),
            ]
        );
        assert_eq!(source.declarations[1].access, AccessLevel::Public);
        assert!(source.declarations[2].inherits);
        // the first top-level type names the source
        assert_eq!(source.opt_text(source.class_name).as_deref(), Some("Shape"));
        assert_eq!(source.extends_name, None);
    }

    fn outline(source: &Source) -> Vec<(String, DeclKind, Option<usize>)> {
        source
            .declarations
            .iter()
            .map(|d| (name(source, d).into_owned(), d.kind, d.parent))
            .collect()
    }

    const CLASS: DeclKind = DeclKind::Type(TypeKind::Class);

    #[test]
    fn kotlin_objects_open_scopes() {
        let input = "class A {\n    companion object {\n        /** Make one. */\n        fun create(): A = A()\n    }\n}\n\nobject Registry {\n    /** Look up. */\n    fun find(id: Int): String = \"\"\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Registry.kt", AccessLevel::Private);
        assert_eq!(
            outline(&source),
            vec![
                ("A".to_string(), CLASS, None),
                (String::new(), CLASS, Some(0)),
                ("create".to_string(), DeclKind::Method, Some(1)),
                ("Registry".to_string(), CLASS, None),
                ("find".to_string(), DeclKind::Method, Some(3)),
            ]
        );
        assert!(source.declarations[1].modifiers.is_static);
        assert!(source.declarations[4].has_doc());
        assert_eq!(source.diagnostics.orphan_comments, 0);
    }

    #[test]
    fn java_record_is_a_type() {
        let input = "/** A point. */\npublic record Point(int x, int y) {\n    /** Norm. */\n    public double norm() { return Math.sqrt(x * x + y * y); }\n}\nclass Log {\n    Object object;\n    void record(int x) {}\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Point.java", AccessLevel::Private);
        assert_eq!(
            outline(&source),
            vec![
                ("Point".to_string(), CLASS, None),
                ("norm".to_string(), DeclKind::Method, Some(0)),
                ("Log".to_string(), CLASS, None),
                ("object".to_string(), DeclKind::Field, Some(2)),
                ("record".to_string(), DeclKind::Method, Some(2)),
            ]
        );
        assert_eq!(code(&source, &source.declarations[0]), "public record Point(int x, int y)");
    }

    #[test]
    fn swift_actor_is_a_type() {
        let input = "/** Holds money. */\npublic actor Bank {\n    var balance: Int = 0\n    /** Adds. */\n    func deposit(_ amount: Int) {\n        balance += amount\n    }\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Bank.swift", AccessLevel::Private);
        assert_eq!(
            outline(&source),
            vec![
                ("Bank".to_string(), CLASS, None),
                ("balance".to_string(), DeclKind::Field, Some(0)),
                ("deposit".to_string(), DeclKind::Method, Some(0)),
            ]
        );
        assert_eq!(source.declarations[0].dialect, Some(Dialect::Swift));
    }

    #[test]
    fn property_accessors_are_skipped() {
        let input = "class Box {\n    val area: Int\n        get() = 1\n    var label: String = \"\"\n        private set\n    var size: Int = 0\n        set(value) {\n            field = value\n        }\n    /** Grows. */\n    fun grow() {}\n}\n";
        let source = parse(input.as_bytes().to_vec(), "Box.kt", AccessLevel::Private);
        let names: Vec<_> = source.declarations.iter().map(|d| name(&source, d)).collect();
        assert_eq!(names, vec!["Box", "area", "label", "size", "grow"]);
        assert!(source.declarations.iter().skip(1).all(|d| d.parent == Some(0)));
        assert!(source.declarations[4].has_doc());
        assert_eq!(source.diagnostics.orphan_comments, 0);
    }

    #[test]
    fn interface_methods_without_bodies_are_methods() {
        let source = java("interface I {\n    /** Does f. */\n    void f();\n    abstract int g();\n}\n");
        assert_eq!(
            outline(&source),
            vec![
                ("I".to_string(), DeclKind::Type(TypeKind::Interface), None),
                ("f".to_string(), DeclKind::Method, Some(0)),
                ("g".to_string(), DeclKind::Method, Some(0)),
            ]
        );
        assert!(source.declarations[1..].iter().all(|d| d.access == AccessLevel::Public));
        assert!(source.declarations[2].modifiers.is_abstract);
        assert_eq!(code(&source, &source.declarations[1]), "void f()");
    }

    #[test]
    fn text_block_contents_are_not_code() {
        let source = java("class Greeter {\n    String greeting = \"\"\"\n        a \" b { c\n        \"\"\";\n    /** Next. */\n    int next;\n}\n");
        assert_eq!(
            outline(&source),
            vec![
                ("Greeter".to_string(), CLASS, None),
                ("greeting".to_string(), DeclKind::Field, Some(0)),
                ("next".to_string(), DeclKind::Field, Some(0)),
            ]
        );
        assert_eq!(code(&source, &source.declarations[1]), "String greeting");
        assert!(source.declarations[2].has_doc());
        assert_eq!(source.diagnostics.orphan_comments, 0);
    }

    #[test]
    fn nesting_cap_keeps_members_with_outer_type() {
        let input = "class A { class B { class C { int c; } } }";
        let options = ParseOptions {
            max_nesting: 1,
            ..Default::default()
        };
        let source = parse_with(input.as_bytes().to_vec(), "A.java", &options);
        let parents: Vec<_> = source.declarations.iter().map(|d| d.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(0), Some(0)]);
        assert_eq!(source.diagnostics.untracked_scopes, 2);
    }

    #[test]
    fn language_override() {
        let options = ParseOptions {
            language: Some(Language::Kotlin),
            ..Default::default()
        };
        let source = parse_with(b"val x = 1\nval y = 2\n".to_vec(), "-", &options);
        assert_eq!(source.language, Language::Kotlin);
        assert_eq!(source.declarations.len(), 2);
    }
}

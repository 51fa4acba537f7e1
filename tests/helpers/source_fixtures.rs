//! Common source code fixtures for tests.

pub const FOUR_CALLS: &str = "a();\nb();\nc();\nd();";

pub const THREE_ARGS: &str = "f(a, b, c);";

pub const IF_WITH_BODY: &str = r#"f();
if (x) {
    a();
    b();
}
g();"#;

pub const NESTED_NAMESPACE: &str = r#"namespace Outer {
    namespace Inner {
        run();
    }
}"#;

pub const SHORTHAND: &str = "const a = 1;\nconst o = { a };";

pub const EXPORTER: &str = "export const a = 1;";

pub const IMPORTER: &str = "import { a } from \"./a\";\na();";

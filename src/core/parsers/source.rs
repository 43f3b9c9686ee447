use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceFile, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// A parsed module together with the text it was parsed from.
///
/// Each file owns its `SourceMap`, so values can be built on any thread.
pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub source_file: Arc<SourceFile>,
}

impl ParsedSource {
    pub fn code(&self) -> &str {
        &self.source_file.src
    }
}

/// Syntax for a file, chosen by extension.
///
/// Plain `.ts` files disable JSX so that `<T>value` assertions parse.
fn syntax_for(file_path: &str) -> Syntax {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax::default()),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Parse JS/TS source text into a module.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );
        let module = parser.parse_module().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            anyhow!(
                "{}:{}: {}",
                loc.line,
                loc.col_display + 1,
                e.into_kind().msg()
            )
        })?;

        Ok(ParsedSource {
            module,
            source_map: source_map.clone(),
            source_file,
        })
    })
}

/// Parse a token stream into a `file_input` tree.
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `witness_syntax::lexer`.
/// - `with_lines`: record source lines on leaves.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), with_lines))]
pub fn parse(tokens: &[Token], with_lines: bool) -> Result<Node, Vec<CompileError>> {
    Parser::new(tokens, with_lines).parse(StartSymbol::File)
}

/// Parse a token stream from an explicit start symbol.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), ?start))]
pub fn parse_from(tokens: &[Token], start: StartSymbol, with_lines: bool) -> Result<Node, Vec<CompileError>> {
    Parser::new(tokens, with_lines).parse(start)
}

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use crate::error::{ModelError, Result};

use super::cnf::{Clause, CnfFormat, Lit, WeightedCnf};

/// The problem line counts distinct variables, not the largest name.
pub fn to_dimacs(cnf: &WeightedCnf) -> String {
    let mut out = String::new();
    let nvar = cnf.variables().len();
    let ncl = cnf.clauses.len();
    match (cnf.format, cnf.top) {
        (CnfFormat::Wcnf, Some(top)) => {
            out.push_str(&format!("p wcnf {} {} {}\n", nvar, ncl, top))
        }
        (format, _) => out.push_str(&format!("p {} {} {}\n", format.as_str(), nvar, ncl)),
    }
    for clause in &cnf.clauses {
        if cnf.format == CnfFormat::Wcnf {
            out.push_str(&format!("{} ", clause.weight));
        }
        for &lit in &clause.lits {
            out.push_str(&format!("{} ", lit.to_dimacs()));
        }
        out.push_str("0\n");
    }
    out
}

pub fn parse_dimacs_str(s: &str) -> Result<WeightedCnf> {
    parse_dimacs_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn read_dimacs_file(path: impl AsRef<Path>) -> Result<WeightedCnf> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        ModelError::value(format!("failed to open {}: {}", path.display(), e))
    })?;
    parse_dimacs_reader(std::io::BufReader::new(file))
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: usize,
    col: usize,
}

impl Token<'_> {
    fn error(&self, msg: impl Into<String>) -> ModelError {
        ModelError::parsing(self.line, self.col, msg)
    }

    fn number<T: std::str::FromStr>(&self) -> Result<T> {
        self.text
            .parse::<T>()
            .map_err(|_| self.error(format!("Expected number, found '{}'", self.text)))
    }
}

#[derive(Debug)]
struct Header {
    format: CnfFormat,
    nvar: u32,
    ncl: u32,
    top: Option<f64>,
}

#[derive(Debug, Default)]
struct OpenClause {
    weight: Option<f64>,
    lits: Vec<Lit>,
    seen: BTreeSet<Lit>,
}

/// Reads `cnf` and `wcnf` problems. Clauses may span lines and must end
/// with the literal `0`.
pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<WeightedCnf> {
    let mut header = None::<Header>;
    let mut clauses = Vec::<Clause>::new();
    let mut open = None::<OpenClause>;
    let mut last_pos = (1usize, 1usize);

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line
            .map_err(|e| ModelError::parsing(line_no, 1, format!("failed to read line: {e}")))?;
        let tokens = tokenize(&line, line_no);
        let Some(first) = tokens.first() else {
            continue;
        };
        last_pos = (line_no, line.len() + 1);

        if open.is_none() && first.text.starts_with('c') {
            continue;
        }
        if open.is_none() && first.text.starts_with('p') {
            if header.is_some() {
                return Err(first.error("Multiple problem lines in dimacs input"));
            }
            header = Some(parse_problem(&tokens, line_no, line.len())?);
            continue;
        }

        let weighted = matches!(
            header.as_ref().map(|h| h.format),
            Some(CnfFormat::Wcnf)
        );
        for tok in &tokens {
            if weighted && open.as_ref().map_or(true, |c| c.weight.is_none()) {
                let w = tok.number::<f64>()?;
                if !(w.is_finite() && w > 0.0) {
                    return Err(tok.error(format!(
                        "Expected positive weight, found '{}'",
                        tok.text
                    )));
                }
                open.get_or_insert_with(OpenClause::default).weight = Some(w);
                continue;
            }
            let x = tok.number::<i32>()?;
            let Some(lit) = Lit::from_dimacs(x) else {
                let done = open.take().unwrap_or_default();
                if done.lits.is_empty() {
                    return Err(tok.error("List of variables in a clause cannot be empty"));
                }
                clauses.push(Clause::new(done.weight.unwrap_or(1.0), done.lits));
                continue;
            };
            let clause = open.get_or_insert_with(OpenClause::default);
            if clause.seen.contains(&lit) {
                return Err(tok.error(format!(
                    "Variable name {} appears multiple times in clause",
                    x
                )));
            }
            if clause.seen.contains(&lit.neg()) {
                return Err(tok.error(format!(
                    "Variable name {} appears both positive and negative in clause",
                    lit.var
                )));
            }
            clause.seen.insert(lit);
            clause.lits.push(lit);
        }
    }

    if open.is_some() {
        return Err(ModelError::parsing(
            last_pos.0,
            last_pos.1,
            "Expected literal 0 terminating the last clause",
        ));
    }
    let Some(header) = header else {
        return Err(ModelError::value("Missing problem line in dimacs input"));
    };
    if clauses.len() != header.ncl as usize {
        return Err(ModelError::value(format!(
            "Number of clauses parsed does not match: {}!={}",
            clauses.len(),
            header.ncl
        )));
    }

    let mut cnf = WeightedCnf::new(header.format);
    cnf.top = header.top;
    for clause in clauses {
        cnf.add_clause(clause);
    }
    let found = cnf.variables().len();
    if found != header.nvar as usize {
        return Err(ModelError::value(format!(
            "Number of variables found does not match: {}!={}",
            found, header.nvar
        )));
    }
    Ok(cnf)
}

fn parse_problem(tokens: &[Token<'_>], line_no: usize, line_len: usize) -> Result<Header> {
    let p = tokens[0];
    if p.text != "p" {
        return Err(p.error(format!("Expected 'p ', found '{}'", p.text)));
    }
    let missing =
        |what: &str| ModelError::parsing(line_no, line_len + 1, format!("Expected {what}"));

    let kind = tokens.get(1).ok_or_else(|| missing("problem type"))?;
    let format = match kind.text {
        "cnf" => CnfFormat::Cnf,
        "wcnf" => CnfFormat::Wcnf,
        other => {
            return Err(kind.error(format!(
                "Expected `type` to be 'cnf' or 'wcnf', found '{}'",
                other
            )));
        }
    };
    let nvar = positive(tokens.get(2).ok_or_else(|| missing("number of variables"))?)?;
    let ncl = positive(tokens.get(3).ok_or_else(|| missing("number of clauses"))?)?;

    let mut top = None;
    let mut rest = tokens[4..].iter();
    if format == CnfFormat::Wcnf {
        if let Some(tok) = rest.next() {
            top = Some(tok.number::<f64>()?);
        }
    }
    if let Some(extra) = rest.next() {
        return Err(extra.error(format!("Unexpected token '{}' in problem line", extra.text)));
    }

    Ok(Header {
        format,
        nvar,
        ncl,
        top,
    })
}

fn positive(tok: &Token<'_>) -> Result<u32> {
    let n = tok.number::<i64>()?;
    if n <= 0 || n > u32::MAX as i64 {
        return Err(tok.error(format!("Expected positive number, found '{}'", tok.text)));
    }
    Ok(n as u32)
}

fn tokenize(line: &str, line_no: usize) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut start = None::<usize>;
    for (i, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push(token_at(line, s, i, line_no));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(token_at(line, s, line.len(), line_no));
    }
    out
}

fn token_at(line: &str, start: usize, end: usize, line_no: usize) -> Token<'_> {
    Token {
        text: &line[start..end],
        line: line_no,
        col: line[..start].chars().count() + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_carry_one_based_columns() {
        let toks = tokenize("  4 1 -2 0", 3);
        let cols = toks.iter().map(|t| t.col).collect::<Vec<_>>();
        assert_eq!(cols, vec![3, 5, 7, 10]);
        assert!(toks.iter().all(|t| t.line == 3));
    }

    #[test]
    fn writer_output_parses_back() {
        let src = "p wcnf 2 3\n1 -1 0\n4 1 2 0\n2 -2 0\n";
        let cnf = parse_dimacs_str(src).expect("parse");
        let again = parse_dimacs_str(&to_dimacs(&cnf)).expect("reparse");
        assert_eq!(cnf, again);
    }
}

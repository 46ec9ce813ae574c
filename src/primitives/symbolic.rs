//! Symbolic polynomial relations.
//!
//! ## Purpose
//!
//! The engine does not parse equation text. It consumes an already reduced
//! relation `P(vars) = 0` through the `SymbolicPolynomial` trait: a total
//! degree, coefficients addressed by monomial, the variable list, and the
//! literal text the relation was written as. Coefficients are `Expression`s
//! so that non-polynomial but solvable forms (`y = sqrt(x)`, `r = cos(2 theta)`)
//! can be carried as functions of the remaining variables.
//!
//! ## Design notes
//!
//! * **Seam**: `Expression` and `SymbolicPolynomial` are the boundary to an
//!   external algebra system; `PolynomialRelation` is the in-crate
//!   implementation used by tests, benchmarks and simple callers.
//! * **Monomials**: A term's powers are a sorted map; zero powers are dropped
//!   so that `x^1 y^0` and `x` address the same coefficient.
//! * **Like terms**: Constant terms with the same monomial are merged on
//!   insertion and removed if they cancel.
//!
//! ## Non-goals
//!
//! * Parsing or simplifying expressions.

// External dependencies
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Variable assignments used to evaluate an expression.
pub type Bindings = HashMap<String, f64>;

/// Look up `name`, yielding NaN when it is unbound.
pub fn lookup(bindings: &Bindings, name: &str) -> f64 {
    bindings.get(name).copied().unwrap_or(f64::NAN)
}

// ============================================================================
// Traits
// ============================================================================

/// A numeric expression in zero or more variables.
pub trait Expression: fmt::Debug {
    /// Evaluate under the given bindings.
    fn evaluate(&self, bindings: &Bindings) -> f64;

    /// Variables the expression depends on, sorted.
    fn variables(&self) -> Vec<String>;
}

/// A polynomial relation `P = 0` in named variables.
pub trait SymbolicPolynomial: fmt::Debug + Send + Sync {
    /// Total degree in the monomial variables.
    fn degree(&self) -> u32;

    /// All variables, sorted alphabetically.
    fn variables(&self) -> Vec<String>;

    /// Coefficient of the monomial `prod(variables[i]^powers[i])`.
    fn coefficient(&self, variables: &[&str], powers: &[u32]) -> Box<dyn Expression>;

    /// Coefficient of the empty monomial.
    fn constant_term(&self) -> Box<dyn Expression> {
        self.coefficient(&[], &[])
    }

    /// True if no coefficient depends on a variable.
    fn has_constant_coefficients(&self) -> bool;

    /// Coefficients of successive powers of `variable`, lowest first.
    ///
    /// Each coefficient is an expression in the remaining variables.
    fn coefficients_in(&self, variable: &str) -> Vec<Box<dyn Expression>>;

    /// The literal equation text.
    fn text(&self) -> &str;
}

// ============================================================================
// Coefficients and Terms
// ============================================================================

type CoefficientFn = Arc<dyn Fn(&Bindings) -> f64 + Send + Sync>;

/// The coefficient of one term: a number, or a function of other variables.
#[derive(Clone)]
pub enum Coefficient {
    /// A fixed number.
    Constant(f64),
    /// A function of the named variables.
    Function {
        /// Variables the function reads.
        variables: Vec<String>,
        /// The function itself.
        eval: CoefficientFn,
    },
}

impl fmt::Debug for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Constant(c) => write!(f, "Constant({c})"),
            Coefficient::Function { variables, .. } => write!(f, "Function({variables:?})"),
        }
    }
}

impl Coefficient {
    fn is_constant(&self) -> bool {
        matches!(self, Coefficient::Constant(_))
    }
}

/// One term: a coefficient times a monomial.
#[derive(Debug, Clone)]
pub struct Term {
    /// Term coefficient.
    pub coefficient: Coefficient,
    /// Variable powers, zero powers omitted.
    pub powers: BTreeMap<String, u32>,
}

impl Term {
    fn degree(&self) -> u32 {
        self.powers.values().sum()
    }
}

impl Expression for Term {
    fn evaluate(&self, bindings: &Bindings) -> f64 {
        let c = match &self.coefficient {
            Coefficient::Constant(c) => *c,
            Coefficient::Function { eval, .. } => eval(bindings),
        };
        self.powers
            .iter()
            .fold(c, |acc, (v, &p)| acc * lookup(bindings, v).powi(p as i32))
    }

    fn variables(&self) -> Vec<String> {
        let mut vars: BTreeSet<String> = self.powers.keys().cloned().collect();
        if let Coefficient::Function { variables, .. } = &self.coefficient {
            vars.extend(variables.iter().cloned());
        }
        vars.into_iter().collect()
    }
}

/// A sum of terms; the empty sum is zero.
#[derive(Debug, Clone, Default)]
pub struct TermSum(pub Vec<Term>);

impl Expression for TermSum {
    fn evaluate(&self, bindings: &Bindings) -> f64 {
        self.0.iter().map(|t| t.evaluate(bindings)).sum()
    }

    fn variables(&self) -> Vec<String> {
        let vars: BTreeSet<String> = self.0.iter().flat_map(|t| t.variables()).collect();
        vars.into_iter().collect()
    }
}

// ============================================================================
// PolynomialRelation
// ============================================================================

/// A relation `sum(terms) = 0` with its original text.
#[derive(Debug, Clone)]
pub struct PolynomialRelation {
    text: String,
    terms: Vec<Term>,
}

fn monomial(variables: &[&str], powers: &[u32]) -> BTreeMap<String, u32> {
    let mut m = BTreeMap::new();
    for (v, &p) in variables.iter().zip(powers) {
        if p > 0 {
            *m.entry((*v).to_string()).or_insert(0) += p;
        }
    }
    m
}

impl PolynomialRelation {
    /// Start an empty relation with the given equation text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            terms: Vec::new(),
        }
    }

    /// Add `c * prod(v^p)`.
    pub fn term(mut self, c: f64, powers: &[(&str, u32)]) -> Self {
        let (vars, pows): (Vec<&str>, Vec<u32>) = powers.iter().copied().unzip();
        let powers = monomial(&vars, &pows);

        if let Some(idx) = self
            .terms
            .iter()
            .position(|t| t.coefficient.is_constant() && t.powers == powers)
        {
            if let Coefficient::Constant(existing) = &mut self.terms[idx].coefficient {
                *existing += c;
                if *existing == 0.0 {
                    self.terms.remove(idx);
                }
            }
            return self;
        }

        if c != 0.0 {
            self.terms.push(Term {
                coefficient: Coefficient::Constant(c),
                powers,
            });
        }
        self
    }

    /// Add `f(bindings) * prod(v^p)` where `f` reads `variables`.
    pub fn function_term<F>(mut self, variables: &[&str], f: F, powers: &[(&str, u32)]) -> Self
    where
        F: Fn(&Bindings) -> f64 + Send + Sync + 'static,
    {
        let (vars, pows): (Vec<&str>, Vec<u32>) = powers.iter().copied().unzip();
        self.terms.push(Term {
            coefficient: Coefficient::Function {
                variables: variables.iter().map(|v| (*v).to_string()).collect(),
                eval: Arc::new(f),
            },
            powers: monomial(&vars, &pows),
        });
        self
    }

    /// The general conic `Ax^2 + Bxy + Cy^2 + Dx + Ey + F = 0`.
    pub fn conic(coefficients: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = coefficients;
        let names = ["x^2", "x*y", "y^2", "x", "y", ""];
        let mut text = String::new();
        for (k, name) in coefficients.iter().zip(names) {
            if *k == 0.0 {
                continue;
            }
            let sign = if *k < 0.0 { " - " } else { " + " };
            let mag = k.abs();
            let body = match (name.is_empty(), mag == 1.0) {
                (true, _) => format!("{mag}"),
                (false, true) => name.to_string(),
                (false, false) => format!("{mag}*{name}"),
            };
            if text.is_empty() {
                text = if *k < 0.0 { format!("-{body}") } else { body };
            } else {
                text.push_str(sign);
                text.push_str(&body);
            }
        }
        if text.is_empty() {
            text.push('0');
        }
        text.push_str(" = 0");

        Self::new(text)
            .term(a, &[("x", 2)])
            .term(b, &[("x", 1), ("y", 1)])
            .term(c, &[("y", 2)])
            .term(d, &[("x", 1)])
            .term(e, &[("y", 1)])
            .term(f, &[])
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Evaluate the left-hand side under `bindings`.
    pub fn evaluate(&self, bindings: &Bindings) -> f64 {
        self.terms.iter().map(|t| t.evaluate(bindings)).sum()
    }
}

impl SymbolicPolynomial for PolynomialRelation {
    fn degree(&self) -> u32 {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    fn variables(&self) -> Vec<String> {
        let vars: BTreeSet<String> = self.terms.iter().flat_map(|t| t.variables()).collect();
        vars.into_iter().collect()
    }

    fn coefficient(&self, variables: &[&str], powers: &[u32]) -> Box<dyn Expression> {
        let target = monomial(variables, powers);
        let matching = self
            .terms
            .iter()
            .filter(|t| t.powers == target)
            .map(|t| Term {
                coefficient: t.coefficient.clone(),
                powers: BTreeMap::new(),
            })
            .collect();
        Box::new(TermSum(matching))
    }

    fn has_constant_coefficients(&self) -> bool {
        self.terms.iter().all(|t| t.coefficient.is_constant())
    }

    fn coefficients_in(&self, variable: &str) -> Vec<Box<dyn Expression>> {
        let top = self
            .terms
            .iter()
            .map(|t| t.powers.get(variable).copied().unwrap_or(0))
            .max()
            .unwrap_or(0);

        let mut sums: Vec<TermSum> = vec![TermSum::default(); top as usize + 1];
        for t in &self.terms {
            let p = t.powers.get(variable).copied().unwrap_or(0);
            let mut rest = t.clone();
            rest.powers.remove(variable);
            sums[p as usize].0.push(rest);
        }

        sums.into_iter()
            .map(|s| Box::new(s) as Box<dyn Expression>)
            .collect()
    }

    fn text(&self) -> &str {
        &self.text
    }
}

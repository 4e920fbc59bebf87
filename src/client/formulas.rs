//! Static physics formula reference shown by the `/physics` command.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy)]
pub struct Formula {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct FormulaSection {
    pub key: &'static str,
    pub title: &'static str,
    pub formulas: &'static [Formula],
}

const fn f(name: &'static str, formula: &'static str, description: &'static str) -> Formula {
    Formula { name, formula, description }
}

pub const SECTIONS: &[FormulaSection] = &[
    FormulaSection {
        key: "mechanics",
        title: "Classical Mechanics",
        formulas: &[
            f("Newton's Second Law", "F = ma", "Force equals mass times acceleration"),
            f("Kinematic Equation", "v² = u² + 2as", "Final velocity squared"),
            f("Work-Energy Theorem", "W = ΔKE = ½mv² - ½mu²", "Work equals change in kinetic energy"),
            f("Momentum", "p = mv", "Momentum equals mass times velocity"),
            f("Impulse", "J = FΔt = Δp", "Impulse equals force times time"),
            f("Gravitational Force", "F = G(m₁m₂)/r²", "Universal gravitation"),
            f("Centripetal Force", "F = mv²/r", "Force toward center of circular motion"),
            f("Simple Harmonic Motion", "x = A cos(ωt + φ)", "Position in SHM"),
        ],
    },
    FormulaSection {
        key: "thermodynamics",
        title: "Thermodynamics",
        formulas: &[
            f("First Law", "ΔU = Q - W", "Change in internal energy"),
            f("Ideal Gas Law", "PV = nRT", "Pressure, volume, temperature relation"),
            f("Heat Transfer", "Q = mcΔT", "Heat equals mass times specific heat times temperature change"),
            f("Efficiency", "η = W/Qₕ = 1 - Qc/Qₕ", "Carnot engine efficiency"),
            f("Entropy Change", "ΔS = ∫(dQ/T)", "Change in entropy"),
            f("Stefan-Boltzmann Law", "j = σT⁴", "Blackbody radiation"),
        ],
    },
    FormulaSection {
        key: "electromagnetism",
        title: "Electromagnetism",
        formulas: &[
            f("Coulomb's Law", "F = kq₁q₂/r²", "Electric force between charges"),
            f("Electric Field", "E = F/q = kQ/r²", "Electric field strength"),
            f("Ohm's Law", "V = IR", "Voltage equals current times resistance"),
            f("Power", "P = VI = I²R = V²/R", "Electrical power"),
            f("Magnetic Force", "F = qvB sin θ", "Force on moving charge in magnetic field"),
            f("Faraday's Law", "ε = -dΦ/dt", "Induced EMF"),
            f("Capacitance", "C = Q/V", "Capacitor charge storage"),
            f("Maxwell's Equations", "∇·E = ρ/ε₀", "Gauss's law for electricity"),
        ],
    },
    FormulaSection {
        key: "waves",
        title: "Waves & Optics",
        formulas: &[
            f("Wave Equation", "v = fλ", "Velocity equals frequency times wavelength"),
            f("Snell's Law", "n₁ sin θ₁ = n₂ sin θ₂", "Refraction of light"),
            f("Mirror Equation", "1/f = 1/do + 1/di", "Spherical mirror formula"),
            f("Lens Equation", "1/f = 1/do + 1/di", "Thin lens formula"),
            f("Doppler Effect", "f' = f(v ± vo)/(v ± vs)", "Frequency shift due to motion"),
            f("Interference", "δ = d sin θ", "Path difference for interference"),
            f("Diffraction Grating", "d sin θ = mλ", "Grating equation"),
        ],
    },
    FormulaSection {
        key: "modern",
        title: "Modern Physics",
        formulas: &[
            f("Mass-Energy", "E = mc²", "Einstein's mass-energy equivalence"),
            f("Planck's Equation", "E = hf", "Energy of a photon"),
            f("De Broglie Wavelength", "λ = h/p", "Matter wave wavelength"),
            f("Photoelectric Effect", "hf = φ + KEmax", "Einstein's photoelectric equation"),
            f("Uncertainty Principle", "Δx Δp ≥ ℏ/2", "Heisenberg uncertainty relation"),
            f("Schrödinger Equation", "iℏ ∂ψ/∂t = Ĥψ", "Time-dependent Schrödinger equation"),
            f("Lorentz Factor", "γ = 1/√(1 - v²/c²)", "Special relativity factor"),
        ],
    },
];

/// Looks a section up by key or by a case-insensitive prefix of its key or title.
#[must_use]
pub fn find_section(query: &str) -> Option<&'static FormulaSection> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    SECTIONS
        .iter()
        .find(|s| s.key == query)
        .or_else(|| SECTIONS.iter().find(|s| s.key.starts_with(&query) || s.title.to_lowercase().starts_with(&query)))
}

#[must_use]
pub fn render_section(section: &FormulaSection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", section.title);
    for formula in section.formulas {
        let _ = writeln!(out, "  {:<24} {}", formula.name, formula.formula);
        let _ = writeln!(out, "  {:<24} {}", "", formula.description);
    }
    out
}

#[must_use]
pub fn render_index() -> String {
    let mut out = String::from("Physics formulas: /physics <section>\n");
    for section in SECTIONS {
        let _ = writeln!(out, "  {:<18} {} ({} formulas)", section.key, section.title, section.formulas.len());
    }
    out
}

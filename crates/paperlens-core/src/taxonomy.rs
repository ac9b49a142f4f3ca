//! Static arXiv category taxonomy.
//!
//! Coarse domain labels (what the user picks) map to the fine-grained subject
//! codes arXiv uses in `cat:` queries; every code also carries the display name
//! shown next to search results. See <https://arxiv.org/category_taxonomy>.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Domain {
    pub label: &'static str,
    pub subjects: &'static [Subject],
}

const fn s(code: &'static str, name: &'static str) -> Subject {
    Subject { code, name }
}

const COMPUTER_SCIENCE: &[Subject] = &[
    s("cs.AI", "Artificial Intelligence"),
    s("cs.AR", "Hardware Architecture"),
    s("cs.CC", "Computational Complexity"),
    s("cs.CE", "Computational Engineering, Finance, and Science"),
    s("cs.CG", "Computational Geometry"),
    s("cs.CL", "Computation and Language"),
    s("cs.CR", "Cryptography and Security"),
    s("cs.CV", "Computer Vision and Pattern Recognition"),
    s("cs.CY", "Computers and Society"),
    s("cs.DB", "Databases"),
    s("cs.DC", "Distributed, Parallel, and Cluster Computing"),
    s("cs.DL", "Digital Libraries"),
    s("cs.DM", "Discrete Mathematics"),
    s("cs.DS", "Data Structures and Algorithms"),
    s("cs.ET", "Emerging Technologies"),
    s("cs.FL", "Formal Languages and Automata Theory"),
    s("cs.GL", "General Literature"),
    s("cs.GR", "Graphics"),
    s("cs.GT", "Computer Science and Game Theory"),
    s("cs.HC", "Human-Computer Interaction"),
    s("cs.IR", "Information Retrieval"),
    s("cs.IT", "Information Theory"),
    s("cs.LG", "Machine Learning"),
    s("cs.LO", "Logic in Computer Science"),
    s("cs.MA", "Multiagent Systems"),
    s("cs.MM", "Multimedia"),
    s("cs.MS", "Mathematical Software"),
    s("cs.NA", "Numerical Analysis"),
    s("cs.NE", "Neural and Evolutionary Computing"),
    s("cs.NI", "Networking and Internet Architecture"),
    s("cs.OH", "Other Computer Science"),
    s("cs.OS", "Operating Systems"),
    s("cs.PF", "Performance"),
    s("cs.PL", "Programming Languages"),
    s("cs.RO", "Robotics"),
    s("cs.SC", "Symbolic Computation"),
    s("cs.SD", "Sound"),
    s("cs.SE", "Software Engineering"),
    s("cs.SI", "Social and Information Networks"),
    s("cs.SY", "Systems and Control"),
];

const MATHEMATICS: &[Subject] = &[
    s("math.AC", "Commutative Algebra"),
    s("math.AG", "Algebraic Geometry"),
    s("math.AP", "Analysis of PDEs"),
    s("math.AT", "Algebraic Topology"),
    s("math.CA", "Classical Analysis and ODEs"),
    s("math.CO", "Combinatorics"),
    s("math.CT", "Category Theory"),
    s("math.CV", "Complex Variables"),
    s("math.DG", "Differential Geometry"),
    s("math.DS", "Dynamical Systems"),
    s("math.FA", "Functional Analysis"),
    s("math.GM", "General Mathematics"),
    s("math.GN", "General Topology"),
    s("math.GR", "Group Theory"),
    s("math.GT", "Geometric Topology"),
    s("math.HO", "History and Overview"),
    s("math.IT", "Information Theory"),
    s("math.KT", "K-Theory and Homology"),
    s("math.LO", "Logic"),
    s("math.MG", "Metric Geometry"),
    s("math.MP", "Mathematical Physics"),
    s("math.NA", "Numerical Analysis"),
    s("math.NT", "Number Theory"),
    s("math.OA", "Operator Algebras"),
    s("math.OC", "Optimization and Control"),
    s("math.PR", "Probability"),
    s("math.QA", "Quantum Algebra"),
    s("math.RA", "Rings and Algebras"),
    s("math.RT", "Representation Theory"),
    s("math.SG", "Symplectic Geometry"),
    s("math.SP", "Spectral Theory"),
    s("math.ST", "Statistics Theory"),
];

const PHYSICS: &[Subject] = &[
    s("physics.acc-ph", "Accelerator Physics"),
    s("physics.ao-ph", "Atmospheric and Oceanic Physics"),
    s("physics.app-ph", "Applied Physics"),
    s("physics.atm-clus", "Atomic and Molecular Clusters"),
    s("physics.atom-ph", "Atomic Physics"),
    s("physics.bio-ph", "Biological Physics"),
    s("physics.chem-ph", "Chemical Physics"),
    s("physics.class-ph", "Classical Physics"),
    s("physics.comp-ph", "Computational Physics"),
    s("physics.data-an", "Data Analysis, Statistics and Probability"),
    s("physics.ed-ph", "Physics Education"),
    s("physics.flu-dyn", "Fluid Dynamics"),
    s("physics.gen-ph", "General Physics"),
    s("physics.geo-ph", "Geophysics"),
    s("physics.hist-ph", "History and Philosophy of Physics"),
    s("physics.ins-det", "Instrumentation and Detectors"),
    s("physics.med-ph", "Medical Physics"),
    s("physics.optics", "Optics"),
    s("physics.plasm-ph", "Plasma Physics"),
    s("physics.pop-ph", "Popular Physics"),
    s("physics.soc-ph", "Physics and Society"),
    s("physics.space-ph", "Space Physics"),
    // high energy physics
    s("hep-ex", "High Energy Physics - Experiment"),
    s("hep-lat", "High Energy Physics - Lattice"),
    s("hep-ph", "High Energy Physics - Phenomenology"),
    s("hep-th", "High Energy Physics - Theory"),
    s("math-ph", "Mathematical Physics"),
    // condensed matter
    s("cond-mat.dis-nn", "Disordered Systems and Neural Networks"),
    s("cond-mat.mes-hall", "Mesoscale and Nanoscale Physics"),
    s("cond-mat.mtrl-sci", "Materials Science"),
    s("cond-mat.other", "Other Condensed Matter"),
    s("cond-mat.quant-gas", "Quantum Gases"),
    s("cond-mat.soft", "Soft Condensed Matter"),
    s("cond-mat.stat-mech", "Statistical Mechanics"),
    s("cond-mat.str-el", "Strongly Correlated Electrons"),
    s("cond-mat.supr-con", "Superconductivity"),
    // astrophysics
    s("astro-ph.CO", "Cosmology and Nongalactic Astrophysics"),
    s("astro-ph.GA", "Astrophysics of Galaxies"),
    s("astro-ph.EP", "Earth and Planetary Astrophysics"),
    s("astro-ph.HE", "High Energy Astrophysical Phenomena"),
    s("astro-ph.IM", "Instrumentation and Methods for Astrophysics"),
    s("astro-ph.SR", "Solar and Stellar Astrophysics"),
    s("gr-qc", "General Relativity and Quantum Cosmology"),
    s("quant-ph", "Quantum Physics"),
    // nonlinear sciences
    s("nlin.AO", "Adaptation and Self-Organizing Systems"),
    s("nlin.CD", "Chaotic Dynamics"),
    s("nlin.CG", "Cellular Automata and Lattice Gases"),
    s("nlin.PS", "Pattern Formation and Solitons"),
    s("nlin.SI", "Exactly Solvable and Integrable Systems"),
    s("nucl-ex", "Nuclear Experiment"),
    s("nucl-th", "Nuclear Theory"),
];

const STATISTICS: &[Subject] = &[
    s("stat.AP", "Applications"),
    s("stat.CO", "Computation"),
    s("stat.ME", "Methodology"),
    s("stat.ML", "Machine Learning"),
    s("stat.OT", "Other Statistics"),
    s("stat.TH", "Statistics Theory"),
];

const EESS: &[Subject] = &[
    s("eess.AS", "Audio and Speech Processing"),
    s("eess.IV", "Image and Video Processing"),
    s("eess.SP", "Signal Processing"),
    s("eess.SY", "Systems and Control"),
];

const QUANTITATIVE_BIOLOGY: &[Subject] = &[
    s("q-bio.BM", "Biomolecules"),
    s("q-bio.CB", "Cell Behavior"),
    s("q-bio.GN", "Genomics"),
    s("q-bio.MN", "Molecular Networks"),
    s("q-bio.NC", "Neurons and Cognition"),
    s("q-bio.OT", "Other Quantitative Biology"),
    s("q-bio.PE", "Populations and Evolution"),
    s("q-bio.QM", "Quantitative Methods"),
    s("q-bio.SC", "Subcellular Processes"),
    s("q-bio.TO", "Tissues and Organs"),
];

const QUANTITATIVE_FINANCE: &[Subject] = &[
    s("q-fin.CP", "Computational Finance"),
    s("q-fin.EC", "Economics"),
    s("q-fin.GN", "General Finance"),
    s("q-fin.MF", "Mathematical Finance"),
    s("q-fin.PM", "Portfolio Management"),
    s("q-fin.PR", "Pricing of Securities"),
    s("q-fin.RM", "Risk Management"),
    s("q-fin.ST", "Statistical Finance"),
    s("q-fin.TR", "Trading and Market Microstructure"),
];

const ECONOMICS: &[Subject] = &[
    s("econ.EM", "Econometrics"),
    s("econ.GN", "General Economics"),
    s("econ.TH", "Theoretical Economics"),
];

const DOMAINS: &[Domain] = &[
    Domain { label: "Computer Science", subjects: COMPUTER_SCIENCE },
    Domain { label: "Mathematics", subjects: MATHEMATICS },
    Domain { label: "Physics", subjects: PHYSICS },
    Domain { label: "Statistics", subjects: STATISTICS },
    Domain { label: "Electrical Eng. & Systems Sci.", subjects: EESS },
    Domain { label: "Quantitative Biology", subjects: QUANTITATIVE_BIOLOGY },
    Domain { label: "Quantitative Finance", subjects: QUANTITATIVE_FINANCE },
    Domain { label: "Economics", subjects: ECONOMICS },
];

static ARXIV: LazyLock<Taxonomy> = LazyLock::new(|| Taxonomy::new(DOMAINS));

/// Read-only view over the domain table with a code index for reverse lookup.
#[derive(Debug)]
pub struct Taxonomy {
    domains: &'static [Domain],
    by_code: HashMap<&'static str, (&'static Domain, &'static Subject)>,
}

impl Taxonomy {
    fn new(domains: &'static [Domain]) -> Self {
        let by_code = domains
            .iter()
            .flat_map(|d| d.subjects.iter().map(move |s| (s.code, (d, s))))
            .collect();
        Self { domains, by_code }
    }

    /// The process-wide arXiv taxonomy, built on first use.
    pub fn arxiv() -> &'static Taxonomy {
        &ARXIV
    }

    pub fn domains(&self) -> &'static [Domain] {
        self.domains
    }

    /// Coarse labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.domains.iter().map(|d| d.label).collect()
    }

    pub fn domain(&self, label: &str) -> Option<&'static Domain> {
        self.domains.iter().find(|d| d.label == label)
    }

    /// Subject codes under a coarse label, in table order.
    pub fn codes_for(&self, label: &str) -> Option<Vec<&'static str>> {
        self.domain(label).map(|d| d.subjects.iter().map(|s| s.code).collect())
    }

    /// Reverse lookup: subject code to display name.
    pub fn display_name(&self, code: &str) -> Option<&'static str> {
        self.by_code.get(code).map(|(_, s)| s.name)
    }

    /// Coarse label owning a subject code.
    pub fn label_of(&self, code: &str) -> Option<&'static str> {
        self.by_code.get(code).map(|(d, _)| d.label)
    }

    pub fn is_display_name(&self, name: &str) -> bool {
        self.by_code.values().any(|(_, s)| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

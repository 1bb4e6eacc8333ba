pub mod input;
pub mod output;
pub mod report;

pub use input::{parse_gene_file, parse_gene_json};
pub use output::{write_decision_log, write_gene_output};
pub use report::{render_audit_report, write_audit_report};

pub mod bam;
pub mod pairs;

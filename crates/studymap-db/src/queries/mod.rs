pub mod roadmaps;

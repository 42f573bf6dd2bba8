pub mod export;
pub mod fit;
pub mod polyline;
pub mod reconstruct;

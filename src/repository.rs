pub mod post;

pub use post::PostRepository;

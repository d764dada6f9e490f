pub mod comments;
pub mod files;
pub mod likes;
pub mod posts;

pub use comments::CommentRepository;
pub use files::FileRepository;
pub use likes::LikeRepository;
pub use posts::PostRepository;

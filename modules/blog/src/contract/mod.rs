pub mod client;
pub mod error;
pub mod model;

pub use client::{PostsApi, UsersApi};
pub use error::BlogError;
pub use model::{
    DeleteResult, ListOptions, NewPost, NewUser, ParseSortError, Post, PostPatch, SortField,
    SortOrder, User,
};

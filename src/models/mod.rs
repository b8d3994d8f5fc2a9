pub mod chapter;
pub mod chapter_like;
pub mod chapter_read;
pub mod comment;
pub mod follow;
pub mod genre;
pub mod notification;
pub mod product;
pub mod sale;
pub mod sale_item;
pub mod story;
pub mod story_genre;
pub mod story_like;
pub mod subscription_plan;
pub mod user;
pub mod user_subscription;

pub use chapter::Model as Chapter;
pub use comment::Model as Comment;
pub use genre::Model as Genre;
pub use notification::Model as Notification;
pub use product::Model as Product;
pub use sale::Model as Sale;
pub use story::Model as Story;
pub use subscription_plan::Model as SubscriptionPlan;
pub use user::Model as User;
pub use user_subscription::Model as UserSubscription;

//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations;
//! response projections and the closed domain enums live next to the models
//! they belong to.

pub mod accessory;
pub mod avatar;
pub mod friendship;
pub mod habit;
pub mod habit_log;
pub mod task;
pub mod user;
pub mod user_accessory;

// Re-export specific types to avoid conflicts
pub use accessory::{AccessoryRarity, Column as AccessoryColumn, Entity as Accessory, Model as AccessoryModel};
pub use avatar::{AvatarStage, Column as AvatarColumn, Entity as Avatar, Model as AvatarModel};
pub use friendship::{
    Column as FriendshipColumn, Entity as Friendship, FriendshipStatus, Model as FriendshipModel,
};
pub use habit::{Column as HabitColumn, Entity as Habit, HabitFrequency, Model as HabitModel};
pub use habit_log::{Column as HabitLogColumn, Entity as HabitLog, Model as HabitLogModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel, TaskStatus};
pub use user::{
    Column as UserColumn, Entity as User, Model as UserModel, PublicProfile, UserResponse,
};
pub use user_accessory::{
    Column as UserAccessoryColumn, Entity as UserAccessory, Model as UserAccessoryModel,
};

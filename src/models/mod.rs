pub mod from_row;
pub mod token;
pub mod user;
pub mod workout;

pub use from_row::FromSqliteRow;
pub use token::Token;
pub use user::{Identity, LoginCredentials, Password, RegisterUser, User};
pub use workout::{CreateWorkout, NewWorkoutEntry, UpdateWorkout, Workout, WorkoutEntry};

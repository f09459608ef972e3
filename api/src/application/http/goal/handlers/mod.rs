pub mod select_goal;

pub mod analyze_image;
pub mod change_goal;
pub mod correct_analysis;
pub mod export_document;
pub mod get_recipe_image;
pub mod new_analysis;

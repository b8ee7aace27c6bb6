/// CSS selectors for the seller portal's catalog and login pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locators {
    pub search_field: String,
    pub category_select: String,
    pub set_select: String,
    pub results_marker: String,
    pub current_price: String,
    pub price_input: String,
    pub quantity_input: String,
    pub save_button: String,
    pub logged_in_marker: String,
    pub login_email: String,
    pub login_password: String,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            search_field: "#SearchValue".to_string(),
            category_select: "#CategoryId".to_string(),
            set_select: "#SetNameId".to_string(),
            results_marker: "#inv-actions-wrapper-top".to_string(),
            current_price: "span[data-bind='formatCurrency: lowestPrice']".to_string(),
            price_input: "input[data-bind*='textInput: newPrice']".to_string(),
            quantity_input: "input[data-bind*='textInput: quantity']".to_string(),
            save_button: "input[value='Save'][data-bind*='click: saveProducts']".to_string(),
            logged_in_marker: "#sellerportal-navigation-app-container".to_string(),
            login_email: "input[type='email'], input[name='Email']".to_string(),
            login_password: "input[type='password']".to_string(),
        }
    }
}

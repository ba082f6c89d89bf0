//! Checkout command.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};
use serde_json::json;
use storefront_commerce::prelude::*;

use super::CheckoutArgs;
use crate::commands::cart::show_cart;
use crate::context::Context;
use crate::output::status_badge;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut snapshot = ctx.load_cart()?;
    if snapshot.state.is_empty() {
        bail!(CommerceError::EmptyCart);
    }

    let pricing = ctx.pricing()?;
    let interactive = !ctx.output.is_json() && console::user_attended();

    if !ctx.output.is_json() {
        show_cart(&snapshot, ctx)?;
    }

    let customer = collect_customer(args.name, args.phone, args.alt_phone, args.address, interactive)?;
    customer.validate()?;

    if !args.yes && interactive {
        let total = CartPricing::calculate(&snapshot.state, &pricing)?.total;
        ctx.output.kv("Deliver to", &format!("{}, {}", customer.name, customer.address));
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {total}?"))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let client = ctx.client()?;
    let mut submission = OrderSubmission::new(pricing);

    let spinner = ctx.output.spinner("Placing order...");
    let result = submission.submit(&mut snapshot.state, &customer, &client).await;
    spinner.finish_and_clear();

    // A failed attempt leaves the cart as it was, so there is nothing to save.
    let order = result?;
    ctx.save_cart(&mut snapshot)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "order_id": order.id,
            "status": order.status,
            "total_amount": order.total_amount,
            "created_at": order.created_at,
        }));
        return Ok(());
    }

    ctx.output.success("Order placed successfully! We will contact you soon.");
    if let Some(id) = &order.id {
        ctx.output.kv("Order", id.as_str());
    }
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Payment", order.payment_method.as_str());
    if let Some(created_at) = order.created_at {
        ctx.output.kv("Placed", &created_at.format("%Y-%m-%d %H:%M UTC").to_string());
    }

    Ok(())
}

/// Fill in the customer fields, prompting for missing required ones when
/// a terminal is attached.
fn collect_customer(
    name: Option<String>,
    phone: Option<String>,
    alt_phone: Option<String>,
    address: Option<String>,
    interactive: bool,
) -> Result<CustomerDetails> {
    let name = field_or_prompt(name, "Full name", interactive)?;
    let phone = field_or_prompt(phone, "Phone number", interactive)?;
    let address = field_or_prompt(address, "Delivery address", interactive)?;

    let mut customer = CustomerDetails::new(name, phone, address);
    if let Some(alt) = alt_phone.filter(|p| !p.trim().is_empty()) {
        customer = customer.with_alternate_phone(alt);
    }
    Ok(customer)
}

fn field_or_prompt(value: Option<String>, prompt: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ if interactive => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
        _ => Ok(String::new()),
    }
}
